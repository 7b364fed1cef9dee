//! `questline check` command.

use std::path::Path;

/// Execute the `check` command.
///
/// # Errors
///
/// Returns an error string if the scenario cannot be loaded or its task
/// graph does not validate.
pub fn run(path: &Path) -> Result<(), String> {
    let scenario = super::load(path)?;
    let tasks = scenario.tasks().map_err(|err| err.to_string())?;
    println!("{}: {} quests, {} tasks OK", path.display(), scenario.quests.len(), tasks.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run;
    use std::path::Path;

    #[test]
    fn missing_file_is_an_error() {
        let err = run(Path::new("does/not/exist.yaml")).unwrap_err();
        assert!(err.contains("failed to read scenario"));
    }
}
