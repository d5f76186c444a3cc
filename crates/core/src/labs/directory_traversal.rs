//! Directory traversal against a simulated file viewer.

use super::{Lab, LabCore, LabKind, OPENED_LAB, SUBMITTED};

pub const FLAG: &str = "flag{directory_traversal_success}";

const TRAVERSAL_MARKERS: &[&str] = &["../", "..\\", "%2e%2e", "....//"];

/// Virtual file table served by the viewer. Keys are matched verbatim first,
/// then lower-cased.
const FILES: &[(&str, &str)] = &[
    ("readme.txt", "Welcome to the file viewer application!"),
    (
        "info.txt",
        "This application allows you to view files in the current directory.",
    ),
    ("help.txt", "Usage: Enter a filename to view its contents."),
    ("../config.txt", "Database connection: localhost:3306"),
    (
        "../secret.txt",
        "Secret configuration file\nAPI Key: sk-1234567890\nflag{directory_traversal_success}",
    ),
    (
        "../../etc/passwd",
        "root:x:0:0:root:/root:/bin/bash\nwww-data:x:33:33:www-data:/var/www:/usr/sbin/nologin",
    ),
    ("../../../flag.txt", FLAG),
    ("....//....//flag.txt", FLAG),
    ("%2e%2e%2fflag.txt", FLAG),
];

fn lookup(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    FILES
        .iter()
        .find(|(path, _)| *path == name)
        .or_else(|| FILES.iter().find(|(path, _)| *path == lower))
        .map(|(_, content)| *content)
}

#[derive(Debug)]
pub struct DirectoryTraversalLab {
    core: LabCore,
}

impl DirectoryTraversalLab {
    pub fn new() -> Self {
        Self {
            core: LabCore::new(&[
                (OPENED_LAB, "Start lab"),
                ("found_traversal", "Find traversal vulnerability"),
                ("accessed_parent", "Access parent directory"),
                ("extracted_flag", "Extract flag"),
                (SUBMITTED, "Submit flag"),
            ]),
        }
    }
}

impl Default for DirectoryTraversalLab {
    fn default() -> Self {
        Self::new()
    }
}

impl Lab for DirectoryTraversalLab {
    fn kind(&self) -> LabKind {
        LabKind::DirectoryTraversal
    }

    fn core(&self) -> &LabCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LabCore {
        &mut self.core
    }

    fn handle(&mut self, input: &str) -> Vec<String> {
        let core = &mut self.core;
        core.append_log(format!("File request: {input}"));
        let lower = input.to_lowercase();
        let climbs_parent = lower.contains("../") || lower.contains("..\\");

        if TRAVERSAL_MARKERS.iter().any(|m| lower.contains(m)) {
            core.append_log("Directory traversal attempt detected!");
            core.check("found_traversal");
            if climbs_parent {
                core.check("accessed_parent");
            }
        }

        match lookup(input) {
            Some(content) => {
                core.append_log(format!("File accessed successfully: {input}"));
                if content.contains(FLAG) {
                    core.append_log("Flag found in file!");
                    core.check("extracted_flag");
                    core.success("Directory traversal successful! Flag found in file.");
                } else {
                    core.info("File accessed. Try traversing to parent directories.");
                }
                content.lines().map(str::to_string).collect()
            }
            None => {
                core.append_log(format!("File not found: {input}"));
                if lower.contains("../") {
                    core.info("Access denied. Try different traversal techniques.");
                } else {
                    core.info("File not found. Try using ../ to access parent directories.");
                }
                vec!["Error: File not found or access denied.".into()]
            }
        }
    }
}
