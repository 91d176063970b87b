use arcmon_core::{
    config::CliConfig,
    format::{format_bytes, format_rate, format_reading, format_uptime, UNAVAILABLE},
    Config, FailureKind, MetricsSnapshot, Reading, Sampler, SnapshotAssembler,
};
use clap::{Arg, ArgMatches, Command};
use std::{
    io::{self, Write},
    path::PathBuf,
    process, thread,
    time::Instant,
};

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// How the driver prints each snapshot
#[derive(Debug, Clone, Copy)]
struct Output {
    json: bool,
    max_ticks: Option<u64>,
}

fn cli() -> Command {
    Command::new("arcmon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Samples host metrics on a fixed cadence and prints one snapshot per tick")
        .arg(
            Arg::new("refresh")
                .long("refresh")
                .value_name("MS")
                .help("Tick interval in milliseconds")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("history")
                .long("history")
                .value_name("N")
                .help("Samples kept per history graph")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("disk-path")
                .long("disk-path")
                .value_name("PATH")
                .help("Filesystem to report disk usage for")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("json-config")
                .long("json-config")
                .value_name("PATH")
                .help("Path to JSON configuration file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print each snapshot as one JSON line")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ticks")
                .long("ticks")
                .value_name("N")
                .help("Stop after N ticks")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("background")
                .long("background")
                .help("Sample on a worker thread and read the latest snapshot")
                .action(clap::ArgAction::SetTrue),
        )
}

fn run() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    let output = Output {
        json: matches.get_flag("json"),
        max_ticks: matches.get_one::<u64>("ticks").copied(),
    };

    let engine = SnapshotAssembler::from_config(&config)?;
    if matches.get_flag("background") {
        run_background(engine, &config, output)
    } else {
        run_foreground(engine, &config, output)
    }
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<Config> {
    let cli_config = CliConfig {
        refresh_ms: matches.get_one::<u64>("refresh").copied(),
        history_len: matches.get_one::<usize>("history").copied(),
        disk_path: matches.get_one::<PathBuf>("disk-path").cloned(),
    };

    let json_config_path = matches.get_one::<PathBuf>("json-config");
    let config = Config::load(Some(&cli_config), json_config_path.map(PathBuf::as_path))?;
    Ok(config)
}

/// Tick on this thread; each tick starts one interval after the previous
/// one started, or right away if it overran.
fn run_foreground<P>(
    mut engine: SnapshotAssembler<P>,
    config: &Config,
    output: Output,
) -> anyhow::Result<()>
where
    P: arcmon_core::MetricsProvider,
{
    let interval = config.refresh_interval();
    let mut stdout = io::stdout().lock();

    loop {
        let started = Instant::now();
        let snapshot = engine.tick();
        emit(&mut stdout, &snapshot, output)?;

        if output.max_ticks.is_some_and(|max| snapshot.tick + 1 >= max) {
            return Ok(());
        }

        let elapsed = started.elapsed();
        if elapsed > interval {
            log::debug!("Tick {} overran by {:?}", snapshot.tick, elapsed - interval);
        }
        thread::sleep(interval.saturating_sub(elapsed));
    }
}

/// Let a `Sampler` tick in the background and poll its latest snapshot,
/// the way a UI thread would.
fn run_background<P>(
    engine: SnapshotAssembler<P>,
    config: &Config,
    output: Output,
) -> anyhow::Result<()>
where
    P: arcmon_core::MetricsProvider + Send + 'static,
{
    let interval = config.refresh_interval();
    let sampler = Sampler::spawn(engine, interval)?;
    let reader = sampler.reader();
    let mut stdout = io::stdout().lock();
    let mut last_seen: Option<u64> = None;

    loop {
        thread::sleep(interval / 4);

        let Some(snapshot) = reader.latest() else {
            continue;
        };
        if last_seen == Some(snapshot.tick) {
            continue;
        }
        last_seen = Some(snapshot.tick);
        emit(&mut stdout, &snapshot, output)?;

        if output.max_ticks.is_some_and(|max| snapshot.tick + 1 >= max) {
            sampler.stop();
            return Ok(());
        }
    }
}

fn emit<W: Write>(writer: &mut W, snapshot: &MetricsSnapshot, output: Output) -> anyhow::Result<()> {
    if output.json {
        serde_json::to_writer(&mut *writer, snapshot)?;
        writeln!(writer)?;
    } else {
        writeln!(writer, "{}", summary_line(snapshot))?;
    }
    writer.flush()?;
    Ok(())
}

fn summary_line(snapshot: &MetricsSnapshot) -> String {
    let sample = &snapshot.sample;

    let cpu = format_reading(&sample.cpu_percent, |v| format!("{:.1}%", v));
    let memory = format_reading(&sample.memory, |m| {
        format!(
            "{:.1}% ({} / {})",
            m.percent,
            format_bytes(m.used),
            format_bytes(m.total)
        )
    });
    let swap = format_reading(&sample.swap, |s| format!("{:.1}%", s.percent));
    let network = match &snapshot.rate {
        Some(rate) => format!(
            "up {} down {}",
            format_rate(rate.up_bps),
            format_rate(rate.down_bps)
        ),
        None => UNAVAILABLE.to_string(),
    };
    let disk = format_reading(&sample.disk, |d| format!("{:.1}%", d.percent));
    let procs = format_reading(&sample.process_count, |n| n.to_string());
    // No battery is the normal desktop case; show it as mains power
    let battery = match &sample.battery {
        Reading::Available(b) if b.plugged == Some(true) => format!("{:.0}% plugged", b.percent),
        Reading::Available(b) => format!("{:.0}%", b.percent),
        Reading::Unavailable(u) if u.kind == FailureKind::SensorUnavailable => "AC".to_string(),
        Reading::Unavailable(_) => UNAVAILABLE.to_string(),
    };
    let top = snapshot
        .top_process
        .as_ref()
        .map(|p| format!("{} {:.1}%", p.name, p.cpu_percent))
        .unwrap_or_else(|| "-".to_string());
    let uptime = format_reading(&sample.boot_time, |boot| {
        snapshot
            .captured_at
            .duration_since(*boot)
            .map(format_uptime)
            .unwrap_or_else(|_| UNAVAILABLE.to_string())
    });
    let self_mem = format_reading(&sample.self_rss, |rss| format_bytes(*rss));

    format!(
        "[{}] cpu {} | mem {} | swap {} | net {} | disk {} | procs {} | bat {} | top {} | up {} | self {}",
        snapshot.tick, cpu, memory, swap, network, disk, procs, battery, top, uptime, self_mem
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_flags() {
        let matches = cli()
            .try_get_matches_from([
                "arcmon",
                "--refresh",
                "500",
                "--history",
                "30",
                "--json",
                "--ticks",
                "3",
            ])
            .unwrap();

        assert_eq!(matches.get_one::<u64>("refresh"), Some(&500));
        assert_eq!(matches.get_one::<usize>("history"), Some(&30));
        assert!(matches.get_flag("json"));
        assert!(!matches.get_flag("background"));
        assert_eq!(matches.get_one::<u64>("ticks"), Some(&3));
    }

    #[test]
    fn test_cli_rejects_zero_ticks() {
        assert!(cli().try_get_matches_from(["arcmon", "--ticks", "0"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        cli().debug_assert();
    }
}
