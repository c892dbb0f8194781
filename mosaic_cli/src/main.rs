use anyhow::{Context, Result};
use chrono::SecondsFormat;
use log::info;
use mosaic::{ByteWindow, Decoder, DerivedCache, Outcome, Record, RecordKind, Request};
use std::io::ErrorKind;

mod cli;

fn main() -> Result<()> {
    env_logger::Builder::new()
        .format_timestamp(None)
        .format_target(false)
        .filter_level(log::LevelFilter::Info)
        .parse_env("LOG_LEVEL")
        .init();

    let cli = cli::command()
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .get_matches();

    let mut input = cli::open_input(&cli)?;
    let filter = cli::kind_filter(&cli);
    let json = cli.get_flag("json");
    let composites: Vec<RecordKind> = filter
        .iter()
        .copied()
        .filter(|kind| kind.is_composite())
        .collect();

    let mut decoder = Decoder::new(cli::decoder_config(&cli));
    let mut pending = Vec::new();
    let mut buf = [0u8; 1024];
    info!("Waiting for messages...");
    loop {
        let len = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(len) => len,
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted) => continue,
            Err(e) => return Err(e).context("Failed to read input"),
        };
        pending.extend_from_slice(&buf[..len]);

        let mut window = ByteWindow::new(&pending);
        loop {
            match decoder.decode(&mut window, Request::Any) {
                Ok(Outcome::Decoded(record)) => {
                    let kind = record.kind();
                    if filter.is_empty() || filter.contains(&kind) {
                        print_record(&record, json)?;
                    }
                    for &composite in &composites {
                        if !depends_on(composite, kind) || !epoch_complete(decoder.cache(), composite) {
                            continue;
                        }
                        let mut empty = ByteWindow::new(&[]);
                        if let Ok(Outcome::Decoded(fix)) =
                            decoder.decode(&mut empty, Request::Kind(composite))
                        {
                            print_record(&fix, json)?;
                        }
                    }
                },
                Ok(Outcome::NeedMoreData { .. }) => break,
                // failures are already logged by the decoder
                Ok(_) | Err(_) => {},
            }
        }
        let consumed = window.position();
        pending.drain(..consumed);
    }
    info!("End of input");
    Ok(())
}

fn depends_on(composite: RecordKind, kind: RecordKind) -> bool {
    match composite {
        RecordKind::NavSatFix => {
            matches!(kind, RecordKind::PvtGeodetic | RecordKind::PosCovGeodetic)
        },
        RecordKind::GpsFix => matches!(
            kind,
            RecordKind::PvtGeodetic
                | RecordKind::PosCovGeodetic
                | RecordKind::AttEuler
                | RecordKind::AttCovEuler
        ),
        _ => false,
    }
}

/// True once every input of `composite` comes from the same epoch.
fn epoch_complete(cache: &DerivedCache, composite: RecordKind) -> bool {
    let tows = [
        cache.pvt_geodetic().map(|block| block.tow),
        cache.pos_cov_geodetic().map(|block| block.tow),
        cache.att_euler().map(|block| block.tow),
        cache.att_cov_euler().map(|block| block.tow),
    ];
    let inputs = if composite == RecordKind::GpsFix {
        &tows[..]
    } else {
        &tows[..2]
    };
    inputs[0].is_some() && inputs.iter().all(|tow| *tow == inputs[0])
}

fn print_record(record: &Record, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(record)?);
        return Ok(());
    }
    let time = record
        .stamp()
        .to_datetime()
        .map(|time| time.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default();
    println!("{time} {} #{}: {:?}", record.kind(), record.seq(), record);
    Ok(())
}
