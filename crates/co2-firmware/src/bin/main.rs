#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use co2_firmware::aio::{TcpUploader, TlsBuffers};
use co2_firmware::hardware::{create_i2c_bus, share_i2c_bus};
use co2_firmware::oled::OledPanel;
use co2_firmware::secrets;
use co2_firmware::wifi::EspWifiLink;
use co2_sparkline::monitor::Monitor;
use co2_sparkline::network::{Credentials, RetryPolicy, bring_up};
use co2_sparkline::sensors::Scd30;
use co2_sparkline::uplink::AdafruitIoRequest;
use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_net::StackResources;
use embassy_time::Delay;
use esp_hal::clock::CpuClock;
use esp_hal::rng::{Trng, TrngSource};
use esp_hal::timer::timg::TimerGroup;
use log::{error, info};

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 73744);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("Embassy initialized!");

    let app_config = secrets::config();
    if let Err(e) = app_config.validate() {
        panic!("Invalid configuration: {}", e);
    }

    // Sensor and display share I2C0
    let i2c = create_i2c_bus(peripherals.I2C0, peripherals.GPIO12, peripherals.GPIO11)
        .expect("Failed to configure I2C");
    let (sensor_bus, display_bus) = share_i2c_bus(i2c);

    let panel = OledPanel::new(display_bus)
        .await
        .expect("Failed to initialize display");

    let mut scd30 = Scd30::new(sensor_bus, Delay);
    if let Err(e) = scd30.start_continuous_measurement(0).await {
        error!("Failed to start SCD30: {}", e);
    }
    match scd30.settings().await {
        Ok(settings) => settings.log(),
        Err(e) => error!("Failed to read SCD30 settings: {}", e),
    }

    // Network stack; the runner is polled alongside the app below
    let radio_init = esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller");
    let (controller, interfaces) =
        esp_radio::wifi::new(&radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi controller");

    // Entropy for the network stack seed and TLS handshakes
    let _trng_source = TrngSource::new(peripherals.RNG, peripherals.ADC1);
    let trng = Trng::try_new().expect("TRNG source was enabled above");
    let seed = (u64::from(trng.random()) << 32) | u64::from(trng.random());
    let mut resources = StackResources::<3>::new();
    let (stack, mut runner) = embassy_net::new(
        interfaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        &mut resources,
        seed,
    );

    let app = async move {
        let mut link = EspWifiLink::new(controller, stack);
        let mut connected = false;

        if let Some(internet) = app_config.internet {
            let credentials = Credentials {
                ssid: internet.ssid,
                password: internet.password,
            };
            match bring_up(&mut link, credentials, RetryPolicy::default(), &mut Delay).await {
                Ok(_) => connected = true,
                Err(e) => error!("{}", e),
            }
        } else {
            info!("No WiFi credentials, running offline");
        }

        let mut monitor = Monitor::new(scd30, panel, Delay, &app_config)
            .expect("Configuration was validated above");

        if connected && let Some(feed) = app_config.feed {
            let uploader = TcpUploader::new(
                stack,
                AdafruitIoRequest::new(feed.username, feed.key),
                trng,
                TlsBuffers::take(),
            );
            let feed_key = feed.feed_key().expect("Configuration was validated above");
            monitor = monitor.with_uplink(uploader, feed_key);
        }
        monitor.set_wifi_connected(connected);

        if let Err(e) = monitor.startup().await {
            error!("Start-up screen failed: {}", e);
        }
        monitor.run().await
    };

    match select(runner.run(), app).await {
        Either::First(never) | Either::Second(never) => never,
    }
}
