use chordfold::{LookupReport, LookupStats, Outline};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        fn wrap(&self, s: &str, code: &str) -> String {
            if self.enabled { format!("{code}{s}{RESET}") } else { s.to_string() }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            self.wrap(s.as_ref(), color)
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            self.wrap(s.as_ref(), BOLD)
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            self.wrap(s.as_ref(), DIM)
        }
    }
}

pub fn print_lookup(outline: &Outline, direct: Option<&str>, report: &LookupReport, host_entries: usize, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Looking up: {outline}"), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Host ━━━", ansi::GRAY));
    println!("  {} {}", palette.dim("entries:"), palette.paint(host_entries.to_string(), ansi::BLUE));
    match direct {
        Some(translation) => {
            println!("  {} {}", palette.dim("direct:"), palette.bold(palette.paint(translation, ansi::GREEN)))
        }
        None => println!("  {} {}", palette.dim("direct:"), palette.dim("✗ none")),
    }

    println!("\n{}", palette.paint("━━━ Fold ━━━", ansi::GRAY));
    match (&report.translation, &report.rule) {
        (Some(translation), rule) => {
            println!(
                "  {} {} {} {}",
                palette.bold(palette.paint(translation, ansi::GREEN)),
                palette.dim("│ rule:"),
                palette.paint(rule.as_deref().unwrap_or("?"), ansi::CYAN),
                if report.shorter_outline_found { palette.dim("│ shorter outline found") } else { String::new() },
            );
        }
        (None, _) => {
            println!("{}", palette.dim("  No fold matched"));
            println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
            if report.shorter_outline_found {
                println!("  • A shorter outline already translates (try --no-shorter-check)");
            }
            println!("  • No rule's folded keys are present in the outline");
            println!("  • The defolded outline or the fold chord has no host entry (add one with --entry)");
            println!("\n{}", palette.dim("  Tip: Set CHORDFOLD_LOG=chordfold=trace to see rule evaluation"));
        }
    }

    println!("\n{}", palette.paint("━━━ Rules ━━━", ansi::GRAY));
    print_stats(&report.stats, &palette);

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!("  Total: {}", palette.paint(format!("{:?}", report.elapsed), ansi::GREEN));
    println!();
}

fn print_stats(stats: &LookupStats, palette: &ansi::Palette) {
    let rows = [
        ("rule attempts", stats.rule_attempts),
        ("candidates", stats.candidates),
        ("strategy calls", stats.strategy_calls),
        ("overlaps skipped", stats.overlaps_skipped),
        ("memo hits", stats.memo_hits),
        ("reentries denied", stats.reentries_denied),
        ("shorter-outline suppressions", stats.shorter_outline_suppressions),
    ];

    for (label, value) in rows {
        let value = if value > 0 { palette.paint(value.to_string(), ansi::YELLOW) } else { palette.dim("0") };
        println!("  {} {}", palette.paint(format!("{label:<30}"), ansi::BLUE), value);
    }
}
