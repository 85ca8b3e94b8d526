//! Station-mode WiFi through `esp-radio`, with DHCP from `embassy-net`

use alloc::string::String;

use co2_sparkline::network::{LinkError, WifiLink};
use embassy_net::Stack;
use embassy_time::{Duration, with_timeout};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiError};
use log::{info, warn};

/// How long to wait for a DHCP lease after associating
const DHCP_TIMEOUT: Duration = Duration::from_secs(15);

pub struct EspWifiLink<'d> {
    controller: WifiController<'d>,
    stack: Stack<'d>,
}

impl<'d> EspWifiLink<'d> {
    pub fn new(controller: WifiController<'d>, stack: Stack<'d>) -> Self {
        Self { controller, stack }
    }

    pub fn stack(&self) -> Stack<'d> {
        self.stack
    }
}

fn radio_error(e: WifiError, during: &'static str) -> LinkError {
    warn!("WiFi {} failed: {:?}", during, e);
    LinkError::Radio(during)
}

impl WifiLink for EspWifiLink<'_> {
    async fn associate(&mut self, ssid: &str, password: &str) -> Result<(), LinkError> {
        let config = ModeConfig::Client(
            ClientConfig::default()
                .with_ssid(String::from(ssid))
                .with_password(String::from(password)),
        );
        self.controller
            .set_config(&config)
            .map_err(|e| radio_error(e, "configure"))?;

        if !matches!(self.controller.is_started(), Ok(true)) {
            self.controller
                .start_async()
                .await
                .map_err(|e| radio_error(e, "start"))?;
        }

        self.controller.connect_async().await.map_err(|e| {
            warn!("Association with {} failed: {:?}", ssid, e);
            LinkError::AuthFailed
        })?;

        with_timeout(DHCP_TIMEOUT, self.stack.wait_config_up())
            .await
            .map_err(|_| LinkError::NoAddress)?;

        if let Some(config) = self.stack.config_v4() {
            info!("IP: {}", config.address);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        matches!(self.controller.is_connected(), Ok(true)) && self.stack.is_config_up()
    }
}
