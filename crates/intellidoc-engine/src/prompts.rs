//! Fixed prompt catalogue for every artifact level.

use intellidoc_core::Prompt;

/// Text stored in place of any summary the backend failed to produce.
pub const PLACEHOLDER: &str = "No response received.";

pub const ROOT_SYSTEM: &str = "You are an AI assistant that summarizes a project.";
pub const FILE_SYSTEM: &str = "You are an AI assistant that analyzes a source code file.";
pub const DIRECTORY_SYSTEM: &str = "You are an AI assistant that analyzes code directories.";
pub const GUIDE_SYSTEM: &str = "You are an AI assistant that creates developer guides.";

pub const GUIDE_OUTLINE: &[&str] = &[
    "Executive Summary",
    "Project Architecture",
    "Setup & Installation",
    "Code Organization",
    "Core Concepts",
    "Development Workflow",
    "API Reference",
    "Common Tasks",
];

pub fn root_prompt(project_dir: &str, listing: &[String]) -> Prompt {
    Prompt::new(
        ROOT_SYSTEM,
        format!(
            "Project directory: {project_dir}\n\n\
             Files and directories:\n{}\n\n\
             Based on these names, what is the main language used, \
             and what is the project's purpose?",
            listing.join("\n")
        ),
    )
}

pub fn file_prompt(rel_path: &str, content: &str) -> Prompt {
    Prompt::new(
        FILE_SYSTEM,
        format!(
            "File path: {rel_path}\n\n\
             Content:\n{content}\n\n\
             Please summarize this file's purpose, main functions/classes, \
             and how it fits into the project."
        ),
    )
}

/// `fragments` are `"<file name>: <summary>"` strings, concatenated with no separator.
pub fn directory_prompt(rel_path: &str, fragments: &[String]) -> Prompt {
    Prompt::new(
        DIRECTORY_SYSTEM,
        format!(
            "Directory path: {rel_path}\n\n\
             File Summaries:\n{}\n\n\
             What is the purpose of this directory, and how do these files work together?",
            fragments.concat()
        ),
    )
}

pub fn guide_prompt(summaries: &str, findings_json: &str) -> Prompt {
    let outline: String = GUIDE_OUTLINE
        .iter()
        .enumerate()
        .map(|(i, section)| format!("{}. {section}\n", i + 1))
        .collect();
    Prompt::new(
        GUIDE_SYSTEM,
        format!(
            "\nBased on the collected analysis below, \
             create a short developer guide in markdown:\n\n\
             Initial Summaries:\n{summaries}\n\n\
             JSON Findings:\n{findings_json}\n\n\
             Guide Outline:\n{outline}"
        ),
    )
}

pub fn chat_system_prompt(context: &str) -> String {
    format!(
        "You are an AI assistant that knows the following code summary:\n\
         {context}\n\n\
         Answer questions about this code. If not sure, provide your best guess.\n\
         Current conversation:\n"
    )
}
