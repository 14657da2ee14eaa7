//! WiFi station-mode adapter.
//!
//! Associates with the configured access point so the connectivity probe
//! has a route.  Association failures are logged and reported, never
//! fatal: a node without a network still raises its fire indicator, and
//! the failed probes show up on the SIM LED.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::wifi::BlockingWifi` over `EspWifi`.
//! - **all other targets**: simulation stub (host networking is already up).

use core::fmt;
use log::info;

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

impl core::error::Error for ConnectivityError {}

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

/// Validated station credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut creds = Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
        };
        creds.ssid.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        creds
            .password
            .push_str(password)
            .map_err(|_| ConnectivityError::InvalidPassword)?;
        Ok(creds)
    }

    /// Build from optional build-time values; `None` SSID means no network.
    pub fn from_env(ssid: Option<&str>, password: Option<&str>) -> Result<Self, ConnectivityError> {
        let ssid = ssid.ok_or(ConnectivityError::NoCredentials)?;
        Self::new(ssid, password.unwrap_or(""))
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// ───────────────────────────────────────────────────────────────
// Station
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connected,
    Failed,
}

pub struct WifiStation {
    credentials: WifiCredentials,
    state: WifiState,
    #[cfg(target_os = "espidf")]
    wifi: Option<BlockingWifi<EspWifi<'static>>>,
}

impl WifiStation {
    pub fn new(credentials: WifiCredentials) -> Self {
        Self {
            credentials,
            state: WifiState::Disconnected,
            #[cfg(target_os = "espidf")]
            wifi: None,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }

    /// Start the driver in station mode and wait for an IP.
    #[cfg(target_os = "espidf")]
    pub fn connect(
        &mut self,
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
    ) -> Result<(), ConnectivityError> {
        info!("WiFi: connecting to '{}'", self.credentials.ssid());
        match self.platform_connect(modem, sysloop, nvs) {
            Ok(wifi) => {
                self.wifi = Some(wifi);
                self.state = WifiState::Connected;
                info!("WiFi: connected");
                Ok(())
            }
            Err(e) => {
                log::error!("WiFi: connection failed: {}", e);
                self.state = WifiState::Failed;
                Err(ConnectivityError::ConnectionFailed)
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn platform_connect(
        &self,
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
    ) -> Result<BlockingWifi<EspWifi<'static>>, esp_idf_svc::sys::EspError> {
        let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), nvs)?, sysloop)?;
        let auth_method = if self.credentials.is_open() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: self.credentials.ssid.clone(),
            password: self.credentials.password.clone(),
            auth_method,
            ..Default::default()
        }))?;
        wifi.start()?;
        wifi.connect()?;
        wifi.wait_netif_up()?;
        Ok(wifi)
    }

    /// Simulation: the host network stack is already up.
    #[cfg(not(target_os = "espidf"))]
    pub fn connect(&mut self) -> Result<(), ConnectivityError> {
        info!("WiFi(sim): connected to '{}'", self.credentials.ssid());
        self.state = WifiState::Connected;
        Ok(())
    }

    pub fn disconnect(&mut self) {
        #[cfg(target_os = "espidf")]
        if let Some(mut wifi) = self.wifi.take() {
            if let Err(e) = wifi.disconnect() {
                log::error!("WiFi: disconnect failed: {}", e);
            }
        }
        self.state = WifiState::Disconnected;
        info!("WiFi: disconnected");
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_ssid() {
        assert_eq!(
            WifiCredentials::new("", "password123"),
            Err(ConnectivityError::InvalidSsid)
        );
    }

    #[test]
    fn rejects_long_ssid() {
        let ssid = "x".repeat(33);
        assert_eq!(
            WifiCredentials::new(&ssid, ""),
            Err(ConnectivityError::InvalidSsid)
        );
    }

    #[test]
    fn rejects_short_password() {
        assert_eq!(
            WifiCredentials::new("MyNet", "short"),
            Err(ConnectivityError::InvalidPassword)
        );
    }

    #[test]
    fn accepts_open_network() {
        let c = WifiCredentials::new("OpenCafe", "").unwrap();
        assert!(c.is_open());
    }

    #[test]
    fn missing_ssid_means_no_credentials() {
        assert_eq!(
            WifiCredentials::from_env(None, Some("password1")),
            Err(ConnectivityError::NoCredentials)
        );
    }

    #[test]
    fn sim_connect_disconnect_roundtrip() {
        let mut s = WifiStation::new(WifiCredentials::new("TestNet", "password1").unwrap());
        s.connect().unwrap();
        assert!(s.is_connected());
        s.disconnect();
        assert_eq!(s.state(), WifiState::Disconnected);
    }
}
