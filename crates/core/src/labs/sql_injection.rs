//! SQL injection against a simulated login form.
//!
//! Input is treated as the username field of
//! `SELECT * FROM users WHERE username = '<input>' AND password = '...'`.

use std::sync::LazyLock;

use regex::Regex;

use super::{Lab, LabCore, LabKind, OPENED_LAB, SUBMITTED};

pub const FLAG: &str = "flag{sql_injection_master}";

/// Always-true conditions and comment-outs that skip the password check.
static TAUTOLOGY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'\s*or\s*'?1'?\s*=\s*'?1|'\s*(--|#)").expect("valid regex")
});

static UNION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"union\s+(all\s+)?select").expect("valid regex"));

#[derive(Debug)]
pub struct SqlInjectionLab {
    core: LabCore,
}

impl SqlInjectionLab {
    pub fn new() -> Self {
        Self {
            core: LabCore::new(&[
                (OPENED_LAB, "Start lab"),
                ("found_injection", "Find injection point"),
                ("bypassed_login", "Bypass login"),
                ("extracted_data", "Extract data"),
                (SUBMITTED, "Submit flag"),
            ]),
        }
    }
}

impl Default for SqlInjectionLab {
    fn default() -> Self {
        Self::new()
    }
}

impl Lab for SqlInjectionLab {
    fn kind(&self) -> LabKind {
        LabKind::SqlInjection
    }

    fn core(&self) -> &LabCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LabCore {
        &mut self.core
    }

    fn handle(&mut self, input: &str) -> Vec<String> {
        let core = &mut self.core;
        core.append_log(format!("Login attempt: username={input}"));
        let lower = input.to_lowercase();
        let query =
            format!("SELECT * FROM users WHERE username = '{input}' AND password = '********'");

        if !lower.contains('\'') {
            core.info("Login failed. Try a single quote in the username field.");
            return vec![query, "Invalid username or password.".into()];
        }

        core.append_log("Injection point detected in username field!");
        core.check("found_injection");

        if UNION_RE.is_match(&lower) {
            core.append_log("UNION query executed against users table");
            core.check("extracted_data");
            core.success("Data extracted! The flag is in the dumped rows.");
            return vec![
                query,
                "id | username | password_hash".into(),
                "1  | admin    | 5f4dcc3b5aa765d61d8327deb882cf99".into(),
                "2  | analyst  | e99a18c428cb38d5f260853678922e03".into(),
                format!("3  | flag     | {FLAG}"),
            ];
        }

        if TAUTOLOGY_RE.is_match(&lower) {
            core.append_log("Authentication bypassed with always-true condition");
            core.check("bypassed_login");
            core.info("Login bypassed. Now try UNION SELECT to dump the users table.");
            return vec![query, "Welcome back, admin!".into()];
        }

        core.info("The quote broke the query. Try making the WHERE clause always true.");
        vec![
            query,
            format!(
                "Error: You have an error in your SQL syntax near '{input}' at line 1"
            ),
        ]
    }
}
