use embassy_time::Duration;
use embedded_hal::delay::DelayNs;

use crate::{
    command::{self, Command},
    helpers::LossyStr,
    Config, Error, Response, Transport, RESPONSE_BUF_SIZE,
};

/// Command channel to a SIM800L module.
///
/// Every exchange transmits one command and then performs exactly one receive
/// into the response buffer, asking for its full capacity `N`. The response
/// is handed out by reference and stays valid until the next exchange.
///
/// `T` may be a borrowed transport (`&mut T`), leaving ownership of the
/// serial port with the caller.
pub struct Sim800l<T, D, const N: usize = RESPONSE_BUF_SIZE> {
    transport: T,
    delay: D,
    response: Response<N>,
    config: Config,
}

impl<T, D, const N: usize> Sim800l<T, D, N>
where
    T: Transport,
    D: DelayNs,
{
    pub fn new(transport: T, delay: D, config: Config) -> Self {
        Self {
            transport,
            delay,
            response: Response::new(),
            config,
        }
    }

    /// Bring the module into a known state: attention check, echo off and
    /// text mode SMS.
    ///
    /// Replies are not inspected, only the one to the last command can be
    /// read afterwards.
    pub fn init(&mut self) -> Result<&Response<N>, Error> {
        info!("Initializing SIM800L");

        self.send_at_command(command::AT)?;
        self.send_at_command(command::ECHO_OFF)?;
        self.send_at_command(command::SMS_TEXT_MODE)
    }

    /// Transmit `command` as is, then capture the reply.
    pub fn send_at_command(&mut self, command: impl AsRef<[u8]>) -> Result<&Response<N>, Error> {
        let cmd = command.as_ref();

        self.send_inner(cmd)?;

        self.response.set_len(0);
        let len = self
            .transport
            .receive(self.response.buf_mut(), self.config.rx_timeout)
            .inspect_err(|e| warn!("No response to {:?}: {:?}", LossyStr(cmd), e))?;
        self.response.set_len(len);

        debug!(
            "Received response ({}/{}): {:?}",
            len,
            N,
            LossyStr(self.response.as_bytes())
        );

        Ok(&self.response)
    }

    /// Send `message` to `phone_number`.
    ///
    /// The module gets `config.prompt_delay` to switch into message entry
    /// before the body is written. Returns as soon as the closing Ctrl+Z has
    /// been transmitted; whether the network accepted the SMS is not known.
    pub fn send_sms(&mut self, phone_number: &str, message: &str) -> Result<(), Error> {
        let cmd = Command::send_sms(phone_number, self.config.overflow)?;

        self.send_at_command(&cmd)?;
        self.wait(self.config.prompt_delay);

        // In message entry the module may stay silent until Ctrl+Z
        match self.send_at_command(message) {
            Ok(_) | Err(Error::Timeout) => {}
            Err(e) => return Err(e),
        }

        self.send_inner(&[command::CTRL_Z])
    }

    /// Query `AT+CSQ`. The raw `+CSQ: <rssi>,<ber>` reply is left to the
    /// caller.
    pub fn read_signal_quality(&mut self) -> Result<&Response<N>, Error> {
        self.send_at_command(command::SIGNAL_QUALITY)
    }

    /// Block for `ms` milliseconds.
    pub fn delay(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// The reply captured by the most recent exchange.
    pub fn response(&self) -> &Response<N> {
        &self.response
    }

    /// The configuration this channel was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    fn send_inner(&mut self, cmd: &[u8]) -> Result<(), Error> {
        if cmd.len() < 50 {
            debug!("Sending command: {:?}", LossyStr(cmd));
        } else {
            debug!("Sending command with long payload ({} bytes)", cmd.len());
        }

        self.transport.transmit(cmd, self.config.tx_timeout)
    }

    fn wait(&mut self, duration: Duration) {
        let ms = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        self.delay.delay_ms(ms);
    }
}
