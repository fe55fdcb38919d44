use bundle_task::BundlerCommand;

/// Parse a bundler command line such as `node tools/build.js --quiet`.
///
/// Words are split on whitespace; the first is the program. Quoting is not
/// supported, use `runner.bundler.args` in the task file for arguments with
/// spaces.
///
/// # Errors
///
/// Returns an error message if the command line is blank.
pub fn parse_bundler_command(s: &str) -> Result<BundlerCommand, String> {
    let mut words = s.split_whitespace();
    let program = words
        .next()
        .ok_or_else(|| "Bundler command cannot be empty".to_string())?;

    Ok(BundlerCommand::new(program).args(words))
}
