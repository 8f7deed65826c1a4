//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::TraversalOrder;

/// Classic coding-interview exercises: strings, graphs, binary trees, build order
#[derive(Parser, Debug)]
#[command(name = "katas")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output to stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file (default: $XDG_CONFIG_HOME/katas/katas.toml)
    #[arg(long, global = true, env = "KATAS_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Arrays and strings exercises
    Strings {
        #[command(subcommand)]
        command: StringsCommands,
    },

    /// Directed graph traversal, routes and build order
    Graph {
        #[command(subcommand)]
        command: GraphCommands,
    },

    /// Binary tree construction, traversal and checks
    Tree {
        #[command(subcommand)]
        command: TreeCommands,
    },

    /// Print the number pyramid
    Pyramid {
        /// Numbers in the widest row (default: pyramid_width setting)
        width: Option<u32>,
    },

    /// Run the built-in demonstration of every exercise
    Demo,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum StringsCommands {
    /// Does every character occur at most once?
    Unique {
        text: String,
        /// Use the allocation-free variant
        #[arg(long)]
        no_storage: bool,
    },

    /// Are the two strings permutations of each other?
    Permutation { first: String, second: String },

    /// Replace spaces with %20
    Urlify { text: String },

    /// Is the text a permutation of a palindrome?
    Palindrome { text: String },
}

/// Graph given as an adjacency matrix.
#[derive(Args, Debug)]
pub struct MatrixArgs {
    /// Rows separated by ';', cells by ',' (e.g. "0,1;0,0")
    #[arg(short, long)]
    pub matrix: String,

    /// Node names (default: 0, 1, 2, ...)
    #[arg(short, long, value_delimiter = ',')]
    pub names: Option<Vec<String>>,
}

#[derive(Subcommand, Debug)]
pub enum GraphCommands {
    /// Breadth-first walk
    Bfs {
        #[command(flatten)]
        graph: MatrixArgs,
        /// Start node (default: first)
        #[arg(short, long)]
        start: Option<String>,
    },

    /// Depth-first walk
    Dfs {
        #[command(flatten)]
        graph: MatrixArgs,
        /// Start node (default: first)
        #[arg(short, long)]
        start: Option<String>,
    },

    /// Is there a route between two nodes?
    Route {
        #[command(flatten)]
        graph: MatrixArgs,
        from: String,
        to: String,
    },

    /// Show the graph
    Show {
        #[command(flatten)]
        graph: MatrixArgs,
    },

    /// Order projects so dependencies build first
    BuildOrder {
        /// Projects, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        projects: Vec<String>,
        /// Dependencies as before:after, comma separated
        #[arg(long, value_delimiter = ',')]
        deps: Vec<String>,
    },
}

/// Values inserted, in order, into a binary search tree.
#[derive(Args, Debug)]
pub struct TreeValues {
    /// Values inserted in order (duplicates are ignored)
    #[arg(required = true, allow_negative_numbers = true)]
    pub values: Vec<i64>,
}

#[derive(Subcommand, Debug)]
pub enum TreeCommands {
    /// Traverse the tree
    Traverse {
        #[command(flatten)]
        tree: TreeValues,
        /// in, pre, post, reverse, level (default: default_order setting)
        #[arg(short, long)]
        order: Option<TraversalOrder>,
    },

    /// Build a minimal-height BST from sorted values
    Minimal {
        /// Strictly increasing values
        #[arg(required = true, allow_negative_numbers = true)]
        sorted: Vec<i64>,
    },

    /// Show the tree
    Show {
        #[command(flatten)]
        tree: TreeValues,
    },

    /// Rebuild the tree with minimal height
    Rebalance {
        #[command(flatten)]
        tree: TreeValues,
    },

    /// Balanced / complete / full / perfect / valid BST
    Check {
        #[command(flatten)]
        tree: TreeValues,
    },

    /// Lowest common ancestor of two values
    Lca {
        #[command(flatten)]
        tree: TreeValues,
        #[arg(long, allow_negative_numbers = true)]
        first: i64,
        #[arg(long, allow_negative_numbers = true)]
        second: i64,
    },

    /// In-order successor of a value
    Successor {
        #[command(flatten)]
        tree: TreeValues,
        #[arg(long, allow_negative_numbers = true)]
        of: i64,
    },

    /// Values per level, or only those at one depth
    Depths {
        #[command(flatten)]
        tree: TreeValues,
        /// Only this depth (root is 0)
        #[arg(short = 'k', long)]
        depth: Option<usize>,
    },

    /// Insertion orders that rebuild the tree
    Sequences {
        #[command(flatten)]
        tree: TreeValues,
        /// How many to list (default: sequence_limit setting)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config path
    Path,
}
