use serde_json::{json, Value};

pub const POLICY_VERSION: &str = "2012-10-17";

/// Resource policy that denies writes and deletes of a parameter to every
/// principal except one IAM role in the owning account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePolicy {
    sid: String,
    principal_arn: String,
}

impl ResourcePolicy {
    pub fn deny_writes_except_role(account_id: &str, role: &str) -> Self {
        // Statement ids only allow alphanumeric characters.
        let role_suffix: String = role.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        ResourcePolicy {
            sid: format!("DenyWritesToEnvironmentParamExcept{}", role_suffix),
            principal_arn: format!("arn:aws:iam::{}:role/{}", account_id, role),
        }
    }

    pub fn principal_arn(&self) -> &str {
        &self.principal_arn
    }

    pub fn to_document(&self) -> Value {
        json!({
            "Version": POLICY_VERSION,
            "Statement": [
                {
                    "Sid": self.sid,
                    "Effect": "Deny",
                    "Action": [
                        "ssm:PutParameter",
                        "ssm:DeleteParameter"
                    ],
                    "Resource": "*",
                    "Condition": {
                        "StringNotEquals": {
                            "aws:PrincipalArn": self.principal_arn
                        }
                    }
                }
            ]
        })
    }

    pub fn to_json(&self) -> String {
        self.to_document().to_string()
    }
}

/// ARN of a parameter, as expected by `PutResourcePolicy`.
pub fn parameter_arn(region: &str, account_id: &str, name: &str) -> String {
    let separator = if name.starts_with('/') { "" } else { "/" };
    format!(
        "arn:aws:ssm:{}:{}:parameter{}{}",
        region, account_id, separator, name
    )
}
