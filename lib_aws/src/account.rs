use std::fmt::Display;

use lib_core::{define_cli_error, CliError};

define_cli_error!(AwsInvalidAccountId, "Invalid AWS account ID.");

/// Account ids are exactly 12 digits. Kept as a string, since leading zeros
/// are significant in ARNs.
pub fn require_aws_account_id(account_id: impl Display) -> Result<String, CliError> {
    let account_id_str = account_id.to_string();
    if account_id_str.len() != 12 || !account_id_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(AwsInvalidAccountId::with_debug(&account_id_str));
    }
    Ok(account_id_str)
}
