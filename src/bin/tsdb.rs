use std::{collections::BTreeMap, ffi, path, process};

use structopt::StructOpt;

use tsindex::{Sample, StoreConfig, TimeSeriesStore};

/// A small demo CLI for exercising a [tsindex::TimeSeriesStore] by hand.
/// Not a benchmark driver or a CSV loader — just `initialize`, one
/// operation, `shutdown`.
#[derive(StructOpt)]
pub struct Opt {
    #[structopt(
        long = "data-dir",
        help = "directory holding the durability log",
        default_value = "."
    )]
    data_dir: ffi::OsString,

    #[structopt(long = "retention-ms", help = "retention window, in milliseconds")]
    retention_ms: Option<i64>,

    #[structopt(subcommand)]
    subcmd: SubCommand,
}

#[derive(StructOpt)]
pub enum SubCommand {
    /// Insert one sample.
    Insert {
        #[structopt(long = "ts", help = "timestamp, milliseconds since epoch")]
        timestamp: i64,

        #[structopt(long = "metric")]
        metric: String,

        #[structopt(long = "value")]
        value: f64,

        #[structopt(long = "tag", help = "key=value, may be repeated")]
        tags: Vec<String>,
    },
    /// Query a half-open time range, optionally filtered by tags.
    Query {
        #[structopt(long = "metric")]
        metric: String,

        #[structopt(long = "from")]
        t_start: i64,

        #[structopt(long = "to")]
        t_end: i64,

        #[structopt(long = "tag", help = "key=value, may be repeated")]
        tags: Vec<String>,
    },
    /// Print the total sample count and known metric names.
    Stats,
}

fn main() {
    env_logger::init();

    if let Err(err) = run(Opt::from_args()) {
        eprintln!("tsdb: {}", err);
        process::exit(1);
    }
}

fn run(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StoreConfig::new(path::PathBuf::from(opt.data_dir));
    if let Some(retention_ms) = opt.retention_ms {
        config = config.set_retention_ms(retention_ms);
    }

    let store = TimeSeriesStore::new(config);
    store.initialize()?;

    match opt.subcmd {
        SubCommand::Insert {
            timestamp,
            metric,
            value,
            tags,
        } => {
            let tags = parse_tags(&tags)?;
            store.insert(Sample::new(timestamp, metric, value, tags))?;
        }
        SubCommand::Query {
            metric,
            t_start,
            t_end,
            tags,
        } => {
            let tags = parse_tags(&tags)?;
            for sample in store.query(&metric, t_start, t_end, &tags)? {
                println!("{}\t{}\t{:?}", sample.timestamp, sample.value, sample.tags);
            }
        }
        SubCommand::Stats => {
            println!("samples: {}", store.len()?);
            println!("metrics: {}", store.metrics()?.join(", "));
        }
    }

    store.shutdown()?;
    Ok(())
}

fn parse_tags(raw: &[String]) -> Result<BTreeMap<String, String>, Box<dyn std::error::Error>> {
    let mut tags = BTreeMap::new();
    for entry in raw {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| format!("malformed tag {:?}, expected key=value", entry))?;
        tags.insert(key.to_string(), value.to_string());
    }
    Ok(tags)
}
