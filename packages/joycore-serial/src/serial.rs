//! Implements discovering, opening, and talking to JoyCore controllers
//! connected over USB CDC serial.

use std::{io, pin::Pin, time::Duration};

use log::{debug, trace, warn};
use serialport::{SerialPortInfo, SerialPortType};
use thiserror::Error;
use tokio::{
    io::{AsyncBufRead, AsyncReadExt, BufReader},
    time::sleep,
};
use tokio_serial::{ClearBuffer, SerialPort, SerialStream};

use crate::{
    config::{JOYCORE_USB_PID, JOYCORE_USB_VID},
    read_response, write_command, Connection, DEFAULT_COMMAND_TIMEOUT,
};

pub const JOYCORE_SERIAL_BAUDRATE: u32 = 115200;

/// Whether a port looks like a JoyCore controller, either by its USB IDs or
/// by its product string.
fn is_joycore_port(port: &SerialPortInfo) -> bool {
    let SerialPortType::UsbPort(info) = &port.port_type else {
        return false;
    };

    (info.vid == JOYCORE_USB_VID && info.pid == JOYCORE_USB_PID)
        || info
            .product
            .as_deref()
            .is_some_and(|product| product.to_lowercase().contains("joycore"))
}

/// Lists every serial port on the system.
pub fn available_ports() -> Result<Vec<SerialPortInfo>, SerialError> {
    Ok(tokio_serial::available_ports()?)
}

/// A one-line description of a port, for listing candidates when no
/// controller was found.
pub fn describe_port(port: &SerialPortInfo) -> String {
    match &port.port_type {
        SerialPortType::UsbPort(info) => format!(
            "{}: {} (USB VID:PID={:04X}:{:04X})",
            port.port_name,
            info.product.as_deref().unwrap_or("USB serial device"),
            info.vid,
            info.pid
        ),
        SerialPortType::PciPort => format!("{}: PCI serial port", port.port_name),
        SerialPortType::BluetoothPort => format!("{}: Bluetooth serial port", port.port_name),
        SerialPortType::Unknown => format!("{}: unknown", port.port_name),
    }
}

/// Finds all connected JoyCore controllers.
pub fn find_devices() -> Result<Vec<SerialDevice>, SerialError> {
    let mut devices = Vec::new();

    for port in available_ports()? {
        if !is_joycore_port(&port) {
            continue;
        }

        if cfg!(target_os = "macos") && port.port_name.starts_with("/dev/tty.") {
            // https://pbxbook.com/other/mac-tty.html
            warn!(
                "Skipping port {:?} because it is a call-in device",
                port.port_name
            );
            continue;
        }

        debug!("Found a JoyCore serial port at {}", port.port_name);
        devices.push(SerialDevice { port_info: port });
    }

    Ok(devices)
}

#[derive(Clone, Debug)]
pub struct SerialDevice {
    port_info: SerialPortInfo,
}

impl SerialDevice {
    /// A device at a known path, skipping discovery.
    pub fn from_path(port_name: impl Into<String>) -> Self {
        Self {
            port_info: SerialPortInfo {
                port_name: port_name.into(),
                port_type: SerialPortType::Unknown,
            },
        }
    }

    pub fn connect(&self) -> Result<SerialConnection, SerialError> {
        SerialConnection::open(self.clone())
    }

    pub fn port_name(&self) -> &str {
        &self.port_info.port_name
    }

    pub fn port_info(&self) -> &SerialPortInfo {
        &self.port_info
    }
}

/// An open serial connection to a JoyCore controller.
#[derive(Debug)]
pub struct SerialConnection {
    device: SerialDevice,
    stream: BufReader<SerialStream>,
    timeout: Duration,
}

impl SerialConnection {
    /// Opens the device at 115200 baud, 8N1.
    pub fn open(device: SerialDevice) -> Result<Self, SerialError> {
        let stream = SerialStream::open(
            &tokio_serial::new(device.port_name(), JOYCORE_SERIAL_BAUDRATE)
                .parity(tokio_serial::Parity::None)
                .stop_bits(tokio_serial::StopBits::One),
        )?;

        Ok(Self {
            device,
            stream: BufReader::new(stream),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        })
    }

    /// Sets how long each command waits for its response to finish.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn device(&self) -> &SerialDevice {
        &self.device
    }

    /// Waits `settle` for the controller to finish booting, then returns
    /// everything it printed in the meantime.
    pub async fn drain_startup(&mut self, settle: Duration) -> Result<Vec<u8>, SerialError> {
        sleep(settle).await;
        let output = self.take_pending().await?;

        debug!("Drained {} bytes of startup output", output.len());
        Ok(output)
    }

    /// Takes every byte that has arrived but not been read yet.
    async fn take_pending(&mut self) -> Result<Vec<u8>, SerialError> {
        let mut pending = self.stream.buffer().to_vec();
        Pin::new(&mut self.stream).consume(pending.len());

        let waiting = self.stream.get_ref().bytes_to_read()? as usize;
        let start = pending.len();
        pending.resize(start + waiting, 0);
        self.stream.get_mut().read_exact(&mut pending[start..]).await?;

        Ok(pending)
    }

    /// Drops any unread input so a response starts clean.
    fn clear_input(&mut self) -> Result<(), SerialError> {
        let buffered = self.stream.buffer().len();
        if buffered > 0 {
            trace!("discarding {buffered} buffered bytes");
        }
        Pin::new(&mut self.stream).consume(buffered);

        self.stream.get_ref().clear(ClearBuffer::Input)?;
        Ok(())
    }
}

impl Connection for SerialConnection {
    type Error = SerialError;

    async fn send_command(&mut self, command: &str) -> Result<Vec<String>, SerialError> {
        self.clear_input()?;
        write_command(self.stream.get_mut(), command).await?;

        Ok(read_response(&mut self.stream, self.timeout).await?)
    }
}

#[derive(Error, Debug)]
pub enum SerialError {
    #[error("IO Error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialport Error: {0}")]
    SerialportError(#[from] tokio_serial::Error),
}
