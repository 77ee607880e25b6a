mod debug_report;

use chordfold::{FoldingDictionary, LookupContext, Options, Outline, StenoDictionary, Translator};
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

/// Suffix entries every host dictionary starts with; `--entry` overrides them.
const SUFFIX_ENTRIES: [(&str, &str); 3] = [("-Z", "{^s}"), ("-D", "{^ed}"), ("-G", "{^ing}")];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("CHORDFOLD_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let folding = match FoldingDictionary::english(config.options.clone()) {
        Ok(folding) => folding,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    // A plain host entry wins over any fold; the report shows both.
    let direct = config.host.get(&config.outline).map(str::to_owned);
    let host_entries = config.host.len();
    let translator = Translator::new().with(config.host).with(folding.clone());
    let mut context = LookupContext::new();

    match folding.get_verbose(&config.outline, &translator, &mut context) {
        Ok(report) => debug_report::print_lookup(&config.outline, direct.as_deref(), &report, host_entries, config.color),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

struct CliConfig {
    outline: Outline,
    host: StenoDictionary,
    options: Options,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut outline: Option<Outline> = None;
    let mut host = StenoDictionary::from_entries(SUFFIX_ENTRIES).map_err(|err| format!("error: {err}"))?;
    let mut options = Options::default();
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("chordfold {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--no-shorter-check" => options.check_shorter_outlines = false,
            "--entry" | "-e" => {
                let value = args.next().ok_or_else(|| "error: --entry expects STENO=TRANSLATION".to_string())?;
                add_entry(&mut host, &value)?;
            }
            "--longest-key" => {
                let value = args.next().ok_or_else(|| "error: --longest-key expects a value".to_string())?;
                options.longest_key = parse_longest_key(&value)?;
            }
            _ if arg.starts_with("--entry=") => {
                add_entry(&mut host, arg.trim_start_matches("--entry="))?;
            }
            _ if arg.starts_with("--longest-key=") => {
                options.longest_key = parse_longest_key(arg.trim_start_matches("--longest-key="))?;
            }
            // Steno outlines may start with '-' ("-Z"), so only known flags are options.
            _ if arg.starts_with("--") => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                if outline.is_some() {
                    return Err("error: outline provided multiple times".to_string());
                }
                outline = Some(Outline::from_steno(&arg).map_err(|err| format!("error: {err}"))?);
            }
        }
    }

    let Some(outline) = outline else {
        return Err(format!("error: no outline provided\n\n{}", help_text()));
    };

    Ok(CliConfig { outline, host, options, color })
}

fn add_entry(host: &mut StenoDictionary, value: &str) -> Result<(), String> {
    let (steno, translation) =
        value.split_once('=').ok_or_else(|| format!("error: invalid --entry '{value}' (expected STENO=TRANSLATION)"))?;
    let outline = Outline::from_steno(steno).map_err(|err| format!("error: invalid --entry '{value}': {err}"))?;
    host.insert(outline, translation);
    Ok(())
}

fn parse_longest_key(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("error: invalid --longest-key '{value}' (expected a positive integer)")),
    }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "chordfold {version}

Look up a steno outline through the built-in English folding rules.

Usage:
  chordfold [OPTIONS] <outline>

Arguments:
  <outline>                      Chords separated by '/', e.g. TPHOZ or TEFT/-D.

Options:
  -e, --entry <STENO=TEXT>       Add a host dictionary entry (repeatable).
                                 Defaults: {defaults}
  --longest-key <n>              Longest outline the folding dictionary accepts.
                                 Default: {longest_key}
  --no-shorter-check             Fold even when a shorter outline already translates.
  --color                        Force ANSI color output.
  --no-color                     Disable ANSI color output.
  -h, --help                     Show this help message.
  -V, --version                  Print version information.

Environment:
  CHORDFOLD_LOG                  Log filter, e.g. debug or chordfold=trace.

Exit codes:
  0  Success (with or without a translation).
  1  Internal error.
  2  Invalid arguments or missing outline.
",
        version = env!("CARGO_PKG_VERSION"),
        defaults = SUFFIX_ENTRIES.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join(" "),
        longest_key = Options::default().longest_key,
    )
}
