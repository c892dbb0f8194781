use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches};
use mosaic::{DecoderConfig, RecordKind, TimeSource, DEFAULT_LEAP_SECONDS};
use serialport::FlowControl as SerialFlowControl;
use std::{fs::File, io::Read, path::PathBuf, time::Duration};

pub fn command() -> clap::Command {
    clap::Command::new("mosaic")
        .about("Decodes the SBF, NMEA and command reply stream of a Septentrio mosaic receiver")
        .arg_required_else_help(true)
        .arg(
            Arg::new("port")
                .value_name("port")
                .short('p')
                .long("port")
                .conflicts_with("file")
                .required_unless_present("file")
                .help("Serial port to open to connect to the receiver"),
        )
        .arg(
            Arg::new("baud-rate")
                .value_name("baud")
                .short('s')
                .long("baud-rate")
                .required(false)
                .default_value("115200")
                .value_parser(value_parser!(u32))
                .help("Baud rate for the selected port"),
        )
        .arg(
            Arg::new("file")
                .value_name("file")
                .short('f')
                .long("file")
                .value_parser(value_parser!(PathBuf))
                .help("Recorded receiver output to decode instead of a serial port"),
        )
        .arg(
            Arg::new("frame-id")
                .long("frame-id")
                .default_value("gnss")
                .help("Frame id written into every record header"),
        )
        .arg(
            Arg::new("local-time")
                .long("local-time")
                .action(ArgAction::SetTrue)
                .help("Stamp records with the host clock instead of the receiver time"),
        )
        .arg(
            Arg::new("leap-seconds")
                .long("leap-seconds")
                .default_value(DEFAULT_LEAP_SECONDS.to_string())
                .value_parser(value_parser!(i64))
                .help("GPS minus UTC offset in seconds"),
        )
        .arg(
            Arg::new("kind")
                .long("kind")
                .action(ArgAction::Append)
                .value_parser(|s: &str| s.parse::<RecordKind>())
                .help("Only print records of this kind, may be repeated. NavSatFix and GPSFix are built once per epoch"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print records as JSON lines"),
        )
}

/// Opens the serial port or file named on the command line.
pub fn open_input(cli: &ArgMatches) -> Result<Box<dyn Read>> {
    if let Some(path) = cli.get_one::<PathBuf>("file") {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        return Ok(Box::new(file));
    }

    let port = cli
        .get_one::<String>("port")
        .context("Either --port or --file is required")?;
    let baud = cli.get_one::<u32>("baud-rate").copied().unwrap_or(115_200);
    let builder = serialport::new(port, baud)
        .timeout(Duration::from_millis(10))
        .flow_control(SerialFlowControl::None);

    log::info!("{:?}", &builder);
    let port = builder
        .open()
        .with_context(|| format!("Failed to open port: {}", port))?;
    Ok(Box::new(port))
}

pub fn decoder_config(cli: &ArgMatches) -> DecoderConfig {
    let mut config = DecoderConfig::default();
    if let Some(frame_id) = cli.get_one::<String>("frame-id") {
        config.frame_id.clone_from(frame_id);
    }
    if cli.get_flag("local-time") {
        config.time_source = TimeSource::Local;
    }
    if let Some(leap_seconds) = cli.get_one::<i64>("leap-seconds") {
        config.leap_seconds = *leap_seconds;
    }
    config
}

/// Record kinds to print, empty for all.
pub fn kind_filter(cli: &ArgMatches) -> Vec<RecordKind> {
    cli.get_many::<RecordKind>("kind")
        .map(|kinds| kinds.copied().collect())
        .unwrap_or_default()
}
