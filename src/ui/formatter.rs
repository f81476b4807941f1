//! Pure formatting functions for UI output.
//!
//! Text is built by `*_text` functions so it can be tested; the `display_*`
//! functions only print it.

use std::path::Path;

use console::style;

use crate::domain::{Version, VersionBump};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Show the repository a release is being prepared in.
pub fn display_repository(root: &Path) {
    display_status(&format!("repository: {}", root.display()));
}

/// Status line naming the tag the current version was read from
pub fn last_version_text(tag: &str) -> String {
    format!("last version: {}", tag)
}

/// Show the tag the current version was read from.
pub fn display_last_version(tag: &str) {
    display_status(&last_version_text(tag));
}

/// Show the accepted version change.
pub fn display_version_change(current: &Version, next: &Version, bump: VersionBump) {
    println!(
        "\n{}\n  From: {}\n  To:   {} ({} release)",
        style("Version Change:").bold(),
        style(current).red(),
        style(next).green(),
        bump
    );
}

/// Text of the manual follow-up steps after the files are updated.
///
/// Nothing here is executed; the user commits, tags and pushes by hand.
pub fn release_instructions_text(script: &Path, version: &Version, tag_prefix: &str) -> String {
    format!(
        "Please run the tests before issuing a release: {script} \n\n\
         to issue release, enter \n \
         git commit -a \n \
         git push \n \
         git tag -a {tag_prefix}{version} -m \"version {version}\"\n \
         git push --tags \n",
        script = script.display(),
    )
}

/// Print the manual follow-up steps.
pub fn display_release_instructions(script: &Path, version: &Version, tag_prefix: &str) {
    println!();
    println!(
        "{}",
        style(release_instructions_text(script, version, tag_prefix)).cyan()
    );
}

/// Summarise what a dry run would have written.
pub fn display_dry_run(header: &Path, header_text: &str, build_file: &Path, changed_lines: usize) {
    display_status("Dry run mode:");
    display_success(&format!("  Step 1: would overwrite {}", header.display()));
    for line in header_text.lines() {
        println!("      {}", style(line).dim());
    }
    display_success(&format!(
        "  Step 2: would patch {} line(s) in {} and keep a backup",
        changed_lines,
        build_file.display()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_instructions_text() {
        let text = release_instructions_text(
            Path::new("/src/CRoaring/tools/prereleasetests.sh"),
            &Version::new(0, 3, 0),
            "v",
        );

        assert_eq!(
            text,
            "Please run the tests before issuing a release: /src/CRoaring/tools/prereleasetests.sh \n\n\
             to issue release, enter \n git commit -a \n git push \n \
             git tag -a v0.3.0 -m \"version 0.3.0\"\n git push --tags \n"
        );
    }

    #[test]
    fn test_last_version_text_shows_tag_only() {
        assert_eq!(last_version_text("v0.2.66"), "last version: v0.2.66");
        assert_eq!(last_version_text("v2.5.0-rc1"), "last version: v2.5.0-rc1");
    }

    #[test]
    fn test_release_instructions_custom_prefix() {
        let text = release_instructions_text(Path::new("t.sh"), &Version::new(1, 0, 0), "release-");
        assert!(text.contains("git tag -a release-1.0.0 -m \"version 1.0.0\""));
    }

    #[test]
    fn test_display_functions_do_not_panic() {
        display_error("test error");
        display_success("test success");
        display_status("test status");
        display_last_version("v1.2.3");
        display_version_change(
            &Version::new(1, 2, 3),
            &Version::new(1, 3, 0),
            VersionBump::Minor,
        );
    }
}
