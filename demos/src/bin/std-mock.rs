use anyhow::Context;
use embassy_time::{Delay, Duration};
use sim800l::{Config, Serial, Sim800l};
use sim800l_demos::common::simulated::SimulatedModem;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let mut serial = Serial::new(SimulatedModem::new(18));

    // Replies are shorter than the response buffer, so give up waiting after
    // a short while instead of blocking until 128 bytes arrive.
    let config = Config::new()
        .rx_timeout(Duration::from_millis(200))
        .prompt_delay(Duration::from_millis(100));
    let mut modem: Sim800l<_, _> = Sim800l::new(&mut serial, Delay, config);

    let response = modem.init().context("init")?;
    log::info!("Init: {:?}", response);

    let response = modem.read_signal_quality().context("signal quality")?;
    log::info!("Signal quality: {:?}", response);

    modem
        .send_sms("+15551234567", "Hello from the simulated SIM800L")
        .context("send sms")?;

    modem.delay(100);
    drop(modem);

    let module = serial.release();
    for sms in module.outbox() {
        log::info!("Outbox: {} <- {:?}", sms.to, sms.body);
    }

    Ok(())
}
