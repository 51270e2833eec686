// App layer: presentation of analysis results for the CLI.

pub mod report;
