use anyhow::Context;
use clap::Parser;
use embassy_time::{Delay, Duration};
use sim800l::{Config, Sim800l};
use sim800l_demos::common::port::Port;

/// Drive a SIM800L attached to a host serial port.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Serial device, e.g. /dev/ttyUSB0
    port: String,

    #[arg(short, long, default_value_t = 9600)]
    baud: u32,

    /// Max time to wait for a reply, in milliseconds. 0 waits forever.
    #[arg(long, default_value_t = 1000)]
    rx_timeout_ms: u64,

    /// Send an SMS to this number after initialization
    #[arg(long, requires = "message")]
    to: Option<String>,

    #[arg(long)]
    message: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut port = Port::open(&args.port, args.baud)
        .with_context(|| format!("Failed to open serial port '{}'", args.port))?;

    let rx_timeout = match args.rx_timeout_ms {
        0 => Duration::MAX,
        ms => Duration::from_millis(ms),
    };
    let mut modem: Sim800l<_, _> =
        Sim800l::new(&mut port, Delay, Config::new().rx_timeout(rx_timeout));

    let response = modem.init().context("init")?;
    log::info!("Init: {:?}", response);

    let response = modem.read_signal_quality().context("signal quality")?;
    log::info!("Signal quality: {:?}", response);

    if let (Some(to), Some(message)) = (&args.to, &args.message) {
        modem.send_sms(to, message).context("send sms")?;
        log::info!("SMS to {} submitted", to);
    }

    Ok(())
}
