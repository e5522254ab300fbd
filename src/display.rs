use serde_json::{Value, json};
use std::io::IsTerminal;

#[cfg(feature = "colors")]
use owo_colors::OwoColorize;

use crate::balance::{Balance, breakdown, skipped_labels};
use crate::workflow::Report;

// Provide a no-op color shim when "colors" feature is disabled
#[cfg(not(feature = "colors"))]
pub mod color_shim {
    use std::fmt::{self, Display, Formatter};

    #[derive(Clone)]
    pub struct Plain(pub String);

    impl Display for Plain {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    pub trait ColorizeShim {
        fn as_str(&self) -> &str;

        fn green(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn red(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn bold(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
    }

    impl ColorizeShim for String {
        fn as_str(&self) -> &str {
            self.as_str()
        }
    }
    impl ColorizeShim for Plain {
        fn as_str(&self) -> &str {
            &self.0
        }
    }
}

#[cfg(not(feature = "colors"))]
use color_shim::ColorizeShim;

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

pub fn format_balance(balance: Balance, color: bool) -> String {
    let text = balance.to_string();
    if !color {
        return text;
    }
    if balance.is_negative() {
        text.red().bold().to_string()
    } else {
        text.green().bold().to_string()
    }
}

/// Plain output: just the balance, so the line can be consumed by scripts.
pub fn print_text_output(report: &Report) {
    println!(
        "{}",
        format_balance(report.timesheet.balance, colors_enabled())
    );
}

pub fn build_json_output(report: &Report) -> Value {
    let entries = &report.timesheet.entries;
    let balance = report.timesheet.balance;
    json!({
        "user_key": report.user_key,
        "number_of_periods": report.number_of_periods,
        "balance": {
            "seconds": balance.seconds(),
            "formatted": balance.to_string(),
        },
        "periods": breakdown(entries),
        "skipped": skipped_labels(entries),
    })
}

pub fn print_json_output(report: &Report) -> anyhow::Result<()> {
    let json = build_json_output(report);
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
