//! Clap derive structures for the `virtool` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// virtool -- manage references, samples and analyses on a Virtool server
#[derive(Debug, Parser)]
#[command(
    name = "virtool",
    version,
    about = "Manage Virtool references, samples and analyses from the command line",
    long_about = "A CLI for Virtool virus detection servers.\n\n\
        Curate reference OTUs, isolates and sequences, manage samples,\n\
        start analyses and administer jobs, HMMs, groups and settings.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "VIRTOOL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 's', env = "VIRTOOL_SERVER", global = true)]
    pub server: Option<String>,

    /// Username to log in with (overrides profile)
    #[arg(long, short = 'u', env = "VIRTOOL_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VIRTOOL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "VIRTOOL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (defaults to the profile's, then 30)
    #[arg(long, env = "VIRTOOL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage references
    #[command(alias = "references", alias = "r")]
    Refs(RefsArgs),

    /// Manage OTUs within a reference
    #[command(alias = "o")]
    Otus(OtusArgs),

    /// Manage the isolates of an OTU
    #[command(alias = "iso")]
    Isolates(IsolatesArgs),

    /// Manage the sequences of an isolate
    #[command(alias = "seq")]
    Sequences(SequencesArgs),

    /// Manage user groups and their permissions
    Groups(GroupsArgs),

    /// Manage samples
    Samples(SamplesArgs),

    /// Manage and start analyses
    Analyses(AnalysesArgs),

    /// Inspect and administer jobs
    Jobs(JobsArgs),

    /// Browse and install HMM profiles
    Hmms(HmmsArgs),

    /// View and change server settings
    Settings(SettingsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Search and pagination arguments shared by find-style list commands.
#[derive(Debug, Args)]
pub struct FindArgs {
    /// Search term
    #[arg(long, short = 'f')]
    pub find: Option<String>,

    /// Page to fetch (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REFERENCES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RefsArgs {
    #[command(subcommand)]
    pub command: RefsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RefsCommand {
    /// List references
    #[command(alias = "ls")]
    List(FindArgs),

    /// Show reference details
    Get {
        /// Reference ID
        id: String,
    },

    /// Create an empty reference
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Data type (genome or barcode)
        #[arg(long, default_value = "genome")]
        data_type: String,

        #[arg(long, default_value = "")]
        organism: String,
    },

    /// Import a reference from an uploaded file
    Import {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// ID of the uploaded reference file
        #[arg(long, value_name = "UPLOAD_ID")]
        file: String,
    },

    /// Remove a reference
    #[command(alias = "rm")]
    Remove {
        /// Reference ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  OTUS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OtusArgs {
    #[command(subcommand)]
    pub command: OtusCommand,
}

#[derive(Debug, Subcommand)]
pub enum OtusCommand {
    /// Find OTUs in a reference
    #[command(alias = "ls")]
    List {
        /// Reference ID
        reference: String,

        #[command(flatten)]
        find: FindArgs,
    },

    /// List every OTU name in a reference
    Names {
        /// Reference ID
        reference: String,
    },

    /// Show OTU details
    Get {
        /// OTU ID
        id: String,
    },

    /// Show the change history of an OTU
    History {
        /// Reference ID
        reference: String,

        /// OTU ID
        id: String,
    },

    /// Look up a GenBank accession
    Genbank {
        accession: String,
    },

    /// Create an OTU in a reference
    Create {
        /// Reference ID
        reference: String,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        abbreviation: String,
    },

    /// Edit an OTU's name, abbreviation or segment schema
    Edit {
        /// OTU ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        abbreviation: Option<String>,

        /// Segment schema as a JSON array, e.g. '[{"name":"RNA1","required":true}]'
        #[arg(long)]
        schema: Option<String>,
    },

    /// Remove an OTU from its reference
    #[command(alias = "rm")]
    Remove {
        /// Reference ID
        reference: String,

        /// OTU ID
        id: String,
    },

    /// Revert an OTU to an earlier version
    Revert {
        /// Reference ID
        reference: String,

        /// OTU ID
        id: String,

        /// Version to revert
        #[arg(id = "otu_version", value_name = "VERSION")]
        version: u32,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ISOLATES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct IsolatesArgs {
    #[command(subcommand)]
    pub command: IsolatesCommand,
}

#[derive(Debug, Args)]
pub struct IsolateFieldArgs {
    /// Source type (isolate, strain, clone, genotype, ...)
    #[arg(long, default_value = "isolate")]
    pub source_type: String,

    /// Source name (e.g. "8816-v2")
    #[arg(long, default_value = "")]
    pub source_name: String,
}

#[derive(Debug, Subcommand)]
pub enum IsolatesCommand {
    /// List the isolates of an OTU
    #[command(alias = "ls")]
    List {
        /// OTU ID
        otu: String,
    },

    /// Add an isolate to an OTU
    Add {
        /// OTU ID
        otu: String,

        #[command(flatten)]
        fields: IsolateFieldArgs,
    },

    /// Change an isolate's source
    Edit {
        /// OTU ID
        otu: String,

        /// Isolate ID
        isolate: String,

        #[command(flatten)]
        fields: IsolateFieldArgs,
    },

    /// Make an isolate the OTU's default
    SetDefault {
        /// OTU ID
        otu: String,

        /// Isolate ID
        isolate: String,
    },

    /// Remove an isolate
    #[command(alias = "rm")]
    Remove {
        /// OTU ID
        otu: String,

        /// Isolate ID
        isolate: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SEQUENCES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SequencesArgs {
    #[command(subcommand)]
    pub command: SequencesCommand,
}

#[derive(Debug, Args)]
pub struct SequenceFieldArgs {
    /// GenBank accession
    #[arg(long)]
    pub accession: String,

    #[arg(long)]
    pub definition: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    /// Nucleotide sequence (ATCGN)
    #[arg(long)]
    pub sequence: Option<String>,

    #[arg(long)]
    pub segment: Option<String>,

    /// Fill missing fields from GenBank
    #[arg(long)]
    pub fetch: bool,
}

#[derive(Debug, Subcommand)]
pub enum SequencesCommand {
    /// List the sequences of an isolate
    #[command(alias = "ls")]
    List {
        /// OTU ID
        otu: String,

        /// Isolate ID
        isolate: String,
    },

    /// Add a sequence to an isolate
    Add {
        /// OTU ID
        otu: String,

        /// Isolate ID
        isolate: String,

        #[command(flatten)]
        fields: SequenceFieldArgs,
    },

    /// Replace a sequence's fields
    Edit {
        /// OTU ID
        otu: String,

        /// Isolate ID
        isolate: String,

        /// Sequence ID
        id: String,

        #[command(flatten)]
        fields: SequenceFieldArgs,
    },

    /// Remove a sequence
    #[command(alias = "rm")]
    Remove {
        /// OTU ID
        otu: String,

        /// Isolate ID
        isolate: String,

        /// Sequence ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GROUPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List groups
    #[command(alias = "ls")]
    List,

    /// Show a group's permissions
    Get {
        /// Group ID
        id: String,
    },

    /// Create a group
    Create {
        /// Group ID (no spaces)
        id: String,
    },

    /// Grant or revoke a permission
    Permission {
        /// Group ID
        id: String,

        /// Permission name (e.g. modify_hmm)
        permission: String,

        /// New value
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },

    /// Remove a group
    #[command(alias = "rm")]
    Remove {
        /// Group ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SAMPLES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SamplesArgs {
    #[command(subcommand)]
    pub command: SamplesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SamplesCommand {
    /// Find samples
    #[command(alias = "ls")]
    List(FindArgs),

    /// Show sample details
    Get {
        /// Sample ID
        id: String,
    },

    /// Create a sample from uploaded read files
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        host: String,

        #[arg(long, default_value = "")]
        isolate: String,

        #[arg(long, default_value = "")]
        locale: String,

        /// Subtraction ID
        #[arg(long)]
        subtraction: Option<String>,

        /// Uploaded read file ID (repeat for paired reads)
        #[arg(long = "file", value_name = "UPLOAD_ID", required = true)]
        files: Vec<String>,
    },

    /// Edit sample metadata
    Edit {
        /// Sample ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        isolate: Option<String>,

        #[arg(long)]
        locale: Option<String>,
    },

    /// Remove a sample
    #[command(alias = "rm")]
    Remove {
        /// Sample ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ANALYSES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AnalysesArgs {
    #[command(subcommand)]
    pub command: AnalysesCommand,
}

#[derive(Debug, Subcommand)]
pub enum AnalysesCommand {
    /// List the analyses of a sample
    #[command(alias = "ls")]
    List {
        /// Sample ID
        sample: String,

        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Show analysis details
    Get {
        /// Analysis ID
        id: String,
    },

    /// Start an analysis
    Create {
        /// Sample ID
        sample: String,

        /// Workflow (e.g. pathoscope_bowtie, nuvs)
        #[arg(long)]
        algorithm: String,

        /// Reference ID
        #[arg(long = "ref")]
        reference: String,
    },

    /// Remove an analysis
    #[command(alias = "rm")]
    Remove {
        /// Analysis ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  JOBS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub command: JobsCommand,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum JobFilter {
    /// Every job that is no longer running
    Finished,
    Complete,
    Failed,
}

#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// Find jobs
    #[command(alias = "ls")]
    List(FindArgs),

    /// Show job details
    Get {
        /// Job ID
        id: String,
    },

    /// Cancel a running job
    Cancel {
        /// Job ID
        id: String,
    },

    /// Remove a finished job
    #[command(alias = "rm")]
    Remove {
        /// Job ID
        id: String,
    },

    /// Remove finished jobs in bulk
    Clear {
        /// Restrict to one kind of finished job
        #[arg(long)]
        filter: Option<JobFilter>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HMMS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct HmmsArgs {
    #[command(subcommand)]
    pub command: HmmsCommand,
}

#[derive(Debug, Subcommand)]
pub enum HmmsCommand {
    /// Find HMM profiles
    #[command(alias = "ls")]
    List(FindArgs),

    /// Show HMM details
    Get {
        /// HMM ID
        id: String,
    },

    /// Show HMM installation status
    Status,

    /// Install the latest HMM release
    Install {
        /// Return as soon as the server accepts the request
        #[arg(long)]
        no_wait: bool,

        /// Seconds between status polls
        #[arg(long, default_value = "2")]
        interval: u64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SETTINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show server settings
    Show,

    /// Change one setting
    Set {
        /// Setting key (e.g. sample_unique_names)
        key: String,

        /// New value, parsed as JSON when possible
        value: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (server, username, password_env, ca_cert, insecure, timeout, throttle_ms)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
