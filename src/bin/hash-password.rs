//! Print a bcrypt hash for ADMIN_PASSWORD_HASH.
//!
//! Usage: hash-password [PASSWORD] [--cost N]
//! Without PASSWORD the first line of stdin is used, which keeps the
//! password out of shell history.

use bcrypt::{hash, DEFAULT_COST};
use std::io::BufRead;

fn parse_args(args: &[String]) -> Result<(Option<String>, u32), String> {
    let mut password = None;
    let mut cost = DEFAULT_COST;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "--cost" {
            let value = iter.next().ok_or("--cost needs a value")?;
            cost = value
                .parse()
                .map_err(|_| format!("invalid cost: {}", value))?;
        } else if password.is_none() {
            password = Some(arg.clone());
        } else {
            return Err(format!("unexpected argument: {}", arg));
        }
    }
    Ok((password, cost))
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (password, cost) = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("{}\nUsage: hash-password [PASSWORD] [--cost N]", e);
        std::process::exit(2);
    });

    let password = password.unwrap_or_else(|| {
        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line).is_err() {
            eprintln!("Failed to read password from stdin");
            std::process::exit(1);
        }
        line.trim_end_matches(['\r', '\n']).to_string()
    });

    if password.is_empty() {
        eprintln!("Password must not be empty");
        std::process::exit(2);
    }

    match hash(&password, cost) {
        Ok(hashed) => {
            println!("# Paste this into your .env (cost {}):", cost);
            println!("ADMIN_PASSWORD_HASH={}", hashed);
        }
        Err(e) => {
            eprintln!("Error hashing password: {}", e);
            std::process::exit(1);
        }
    }
}
