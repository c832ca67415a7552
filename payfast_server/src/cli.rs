use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets. PFG_MERCHANT_KEY is
    // deliberately absent.
    const DISPLAY_ENVS: [&str; 14] = [
        "RUST_LOG",
        "PFG_HOST",
        "PFG_PORT",
        "PFG_DATABASE_URL",
        "PFG_URL_BASE",
        "PFG_SANDBOX",
        "PFG_MERCHANT_ID",
        "PFG_IP_WHITELIST",
        "PFG_IP_SOURCE",
        "PFG_REQUIRE_AMOUNT_MATCH",
        "PFG_AMOUNT_TOLERANCE",
        "PFG_USE_POSTBACK",
        "PFG_POSTBACK_FAILURE",
        "PFG_POSTBACK_TIMEOUT",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
