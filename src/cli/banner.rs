//! Startup banner for `arbiscan run`.

use std::io::IsTerminal;

struct Colors {
    bars: &'static str,
    title: &'static str,
    subtitle: &'static str,
    reset: &'static str,
}

const COLOR: Colors = Colors {
    bars: "\x1b[38;2;80;200;150m",
    title: "\x1b[1;38;2;220;200;120m",
    subtitle: "\x1b[38;2;110;110;130m",
    reset: "\x1b[0m",
};

const PLAIN: Colors = Colors { bars: "", title: "", subtitle: "", reset: "" };

/// Prints the arbiscan banner to stdout. Renders ANSI true-color when stdout
/// is a terminal, falls back to plain text otherwise.
pub fn print_banner() {
    let c = if std::io::stdout().is_terminal() { &COLOR } else { &PLAIN };
    let b = c.bars;
    let t = c.title;
    let s = c.subtitle;
    let r = c.reset;

    println!(
        r#"
{b}  |  .  |  .  |{r}   {t}   _             _     _                      {r}
{b}  |.'   |'.   |{r}   {t}  / \   _ __ ___ (_)___| |_ __ _ _ __          {r}
{b}  '|    |    |'{r}   {t} / _ \ | '__/ _ \| / __| __/ _` | '_ \         {r}
{b}   |    |    |{r}   {t}/ ___ \| | | (_) | \__ \ || (_| | | | |        {r}
{b}   '----+----'{r}   {t}/_/   \_\_|  \___/|_|___/\__\__,_|_| |_|        {r}
{s}cross-venue spot-market arbitrage scanner{r}
"#
    );
}
