use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Print a success message.
pub fn success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    println!("\n{}", msg.bold());
}

/// Progress messages go to stderr so stdout stays clean for armored output.
pub fn status(msg: &str) {
    eprintln!("  {} {}", "✓".green(), msg);
}

/// Spinner on stderr while a blocking step runs. Hidden when `quiet`.
///
/// It is drawn from the calling thread only. No steady tick: a ticker
/// thread would read the environment while a keyring scope writes
/// `GNUPGHOME`.
pub fn spinner(msg: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.tick();
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_shows_message() {
        let pb = spinner("Sending to bob@example.com...", false);
        assert_eq!(pb.message(), "Sending to bob@example.com...");
        assert!(!pb.is_finished());
        pb.finish_and_clear();
    }

    #[test]
    fn quiet_spinner_is_hidden() {
        assert!(spinner("Sending...", true).is_hidden());
    }
}
