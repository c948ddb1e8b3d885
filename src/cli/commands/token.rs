use crate::auth::TokenService;
use crate::config::AppConfig;

/// Issues a token signed with the configured secret, for scripting against a
/// running server without going through `/login`.
pub fn handle(config: AppConfig, username: &str) -> anyhow::Result<()> {
    let tokens = TokenService::from_config(&config.security)?;
    let token = tokens.issue_token(username)?;
    println!("{}", token);
    Ok(())
}
