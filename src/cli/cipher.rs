//! Raw token commands: encrypt, decrypt, check.

use super::Context;
use crate::error::Result;

/// Print the token for `value`.
pub fn encrypt(ctx: &Context, value: &str) -> Result<()> {
    println!("{}", ctx.resolver.encrypt(value)?);
    Ok(())
}

/// Print the plaintext of `token`.
pub fn decrypt(ctx: &Context, token: &str) -> Result<()> {
    // Plain output for scripting - no decoration
    println!("{}", ctx.resolver.decrypt(token)?);
    Ok(())
}

/// Report whether `value` is a token; exits 1 if it is not.
pub fn check(ctx: &Context, value: &str) -> Result<()> {
    if ctx.resolver.is_encrypted(value) {
        println!("encrypted");
        Ok(())
    } else {
        println!("plaintext");
        std::process::exit(1);
    }
}
