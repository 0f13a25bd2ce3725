use grid_regions::engine::{self, EngineConfig};
use grid_regions::exhaustive;

const USAGE: &str =
    "usage: grid-regions [--mode square|rectangle|exhaustive] [--workers K] [--verbose] [N...]";

fn main() {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        println!("{USAGE}");
        return;
    }

    let verbose = args.contains("--verbose");

    let workers: usize = match args.opt_value_from_str("--workers") {
        Ok(workers) => workers.unwrap_or(8),
        Err(err) => fail(format!("couldn't parse --workers: {err}")),
    };
    if workers == 0 {
        fail("--workers must be at least 1".into());
    }

    let mode: String = match args.opt_value_from_str("--mode") {
        Ok(mode) => mode.unwrap_or_else(|| "rectangle".into()),
        Err(err) => fail(format!("couldn't parse --mode: {err}")),
    };

    let mut cases = Vec::new();
    for arg in args.finish() {
        let text = arg.to_string_lossy();
        match text.parse::<i32>() {
            Ok(n) if n >= 1 => cases.push(n),
            _ => fail(format!("couldn't parse argument {text:?} as a grid size")),
        }
    }
    if cases.is_empty() {
        cases = (2..=10).collect();
    }

    let config = EngineConfig { workers, verbose };
    match mode.as_str() {
        "square" => {
            engine::square_enumeration(&cases, config);
        }
        "rectangle" => {
            engine::rectangle_enumeration(&cases, config);
        }
        "exhaustive" => {
            if let Some(n) = cases.iter().find(|&&n| n * n >= 64) {
                fail(format!("size {n} is too large for exhaustive enumeration"));
            }
            exhaustive::exhaustive_enumeration(&cases, &config);
        }
        other => fail(format!(
            "unknown mode {other:?}; expected square, rectangle or exhaustive"
        )),
    }
}

fn fail(message: String) -> ! {
    eprintln!("{message}");
    eprintln!("{USAGE}");
    std::process::exit(1);
}
