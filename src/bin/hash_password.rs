//! Argon2id hashing utility for provisioning accounts by hand.
//!
//! # Usage
//!
//! ```bash
//! echo -n 'secret' | cargo run --bin hash_password
//! cargo run --bin hash_password -- --password 'secret'
//! cargo run --bin hash_password -- --verify '$argon2id$...' < password.txt
//! ```
//!
//! Prints the PHC string on stdout, or `match` / `no match` in verify mode.

use std::io::Read;

use anyhow::{anyhow, Result};
use clinsight::domain::{credential, PasswordHash};
use zeroize::Zeroizing;

const USAGE: &str = "Usage: hash_password [--password <value>] [--verify <phc>]\n\nReads the password from stdin unless --password is given. With --verify, checks the password against <phc> instead of hashing it.";

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let mut password: Option<Zeroizing<String>> = None;
    let mut verify: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--password" => {
                let value = args.next().ok_or_else(|| anyhow!("{USAGE}"))?;
                password = Some(Zeroizing::new(value));
            }
            "--verify" => {
                let value = args.next().ok_or_else(|| anyhow!("{USAGE}"))?;
                verify = Some(value);
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => return Err(anyhow!("Unknown arg: {arg}\n{USAGE}")),
        }
    }

    let password = match password {
        Some(p) => p,
        None => {
            let mut buf = Zeroizing::new(String::new());
            std::io::stdin().read_to_string(&mut buf)?;
            let trimmed = buf.trim_end_matches(['\r', '\n']).to_string();
            Zeroizing::new(trimmed)
        }
    };

    if !credential::meets_min_length(&password) {
        return Err(anyhow!(
            "Password must be at least {} characters.",
            credential::MIN_PASSWORD_LEN
        ));
    }

    match verify {
        Some(phc) => {
            let stored = PasswordHash::from_phc(phc);
            if credential::verify_password(&password, &stored)? {
                println!("match");
            } else {
                println!("no match");
                std::process::exit(1);
            }
        }
        None => println!("{}", credential::hash_password(&password)?.as_str()),
    }

    Ok(())
}
