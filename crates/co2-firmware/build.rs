//! Bakes WiFi and Adafruit IO credentials from `.env` into the binary.
//!
//! Missing keys become empty strings; an empty `AIO_USERNAME` turns uploads
//! off and an empty `WIFI_SSID` keeps the monitor offline.

const KEYS: [(&str, &str); 5] = [
    ("WIFI_SSID", ""),
    ("WIFI_PASSWORD", ""),
    ("AIO_USERNAME", ""),
    ("AIO_KEY", ""),
    ("AIO_FEED", "co2"),
];

fn main() {
    println!("cargo:rerun-if-changed=.env");

    if let Err(e) = dotenvy::dotenv() {
        println!("cargo:warning=No .env loaded ({e}); credentials left empty");
    }

    for (key, default) in KEYS {
        println!("cargo:rerun-if-env-changed={key}");
        let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
        println!("cargo:rustc-env={key}={value}");
    }
}
