use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{
    Cli, Commands, ConfigCommands, GraphCommands, MatrixArgs, StringsCommands, TreeCommands,
    TreeValues,
};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{
    build_order, strings, BinaryTree, DomainError, Graph, Pyramid, TraversalOrder, TreeConvert,
};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli.config.as_deref())?;
    if cli.no_color || !settings.color {
        colored::control::set_override(false);
    }

    match &cli.command {
        Some(Commands::Strings { command }) => _strings(command),
        Some(Commands::Graph { command }) => _graph(command),
        Some(Commands::Tree { command }) => _tree(command, &settings),
        Some(Commands::Pyramid { width }) => _pyramid(width.unwrap_or(settings.pyramid_width)),
        Some(Commands::Demo) => _demo(),
        Some(Commands::Config { command }) => _config(command, &settings, cli.config.as_deref()),
        // completions are written by main before dispatch
        Some(Commands::Completion { .. }) | None => Ok(()),
    }
}

fn load_settings(explicit: Option<&Path>) -> CliResult<Settings> {
    Ok(match explicit {
        Some(path) => Settings::load_from(Some(path))?,
        None => Settings::load()?,
    })
}

#[instrument]
fn _strings(command: &StringsCommands) -> CliResult<()> {
    match command {
        StringsCommands::Unique { text, no_storage } => {
            let unique = if *no_storage {
                strings::is_unique_without_storage(text)
            } else {
                strings::is_unique(text)
            };
            output::verdict(unique, &format!("{text:?} has all unique characters"));
        }
        StringsCommands::Permutation { first, second } => {
            output::verdict(
                strings::check_permutation(first, second),
                &format!("{first:?} and {second:?} are permutations"),
            );
        }
        StringsCommands::Urlify { text } => output::info(&strings::urlify(text)),
        StringsCommands::Palindrome { text } => {
            output::verdict(
                strings::is_permutation_of_palindrome(text),
                &format!("{text:?} is a permutation of a palindrome"),
            );
        }
    }
    Ok(())
}

/// Parses `"0,1;0,0"` into rows of cells.
pub fn parse_matrix(text: &str) -> CliResult<Vec<Vec<u8>>> {
    text.split(';')
        .map(str::trim)
        .filter(|row| !row.is_empty())
        .map(|row| {
            row.split(',')
                .map(|cell| {
                    cell.trim().parse::<u8>().map_err(|e| {
                        CliError::InvalidArgs(format!("matrix cell {cell:?}: {e}"))
                    })
                })
                .collect::<CliResult<Vec<u8>>>()
        })
        .collect()
}

/// Parses `before:after` pairs.
pub fn parse_dependencies(deps: &[String]) -> CliResult<Vec<(String, String)>> {
    deps.iter()
        .map(|dep| {
            dep.split_once(':')
                .map(|(a, b)| (a.trim().to_string(), b.trim().to_string()))
                .filter(|(a, b)| !a.is_empty() && !b.is_empty())
                .ok_or_else(|| {
                    CliError::InvalidArgs(format!("dependency {dep:?}, expected before:after"))
                })
        })
        .collect()
}

fn graph_from_args(args: &MatrixArgs) -> CliResult<Graph> {
    let matrix = parse_matrix(&args.matrix)?;
    let names = match &args.names {
        Some(names) => names.clone(),
        None => (0..matrix.len()).map(|i| i.to_string()).collect(),
    };
    Ok(Graph::from_adjacency_matrix(&matrix, &names)?)
}

#[instrument]
fn _graph(command: &GraphCommands) -> CliResult<()> {
    match command {
        GraphCommands::Bfs { graph, start } | GraphCommands::Dfs { graph, start } => {
            let g = graph_from_args(graph)?;
            let start = start.as_deref().map(|s| g.require_name(s)).transpose()?;
            let visited = if matches!(command, GraphCommands::Bfs { .. }) {
                g.breadth_first(start).map(|(_, n)| n.name.as_str()).join(" ")
            } else {
                g.depth_first(start).map(|(_, n)| n.name.as_str()).join(" ")
            };
            output::info(&visited);
        }
        GraphCommands::Route { graph, from, to } => {
            let g = graph_from_args(graph)?;
            let (a, b) = (g.require_name(from)?, g.require_name(to)?);
            match g.shortest_route(a, b)? {
                Some(path) => {
                    output::verdict(true, &format!("route from {from} to {to}"));
                    output::detail(&path.iter().filter_map(|&i| g.name(i)).join(" -> "));
                }
                None => output::verdict(false, &format!("route from {from} to {to}")),
            }
        }
        GraphCommands::Show { graph } => {
            output::info(&graph_from_args(graph)?.to_tree_string());
        }
        GraphCommands::BuildOrder { projects, deps } => {
            let deps = parse_dependencies(deps)?;
            let order = build_order(projects, &deps)?;
            output::info(&order.join(", "));
        }
    }
    Ok(())
}

fn bst(values: &TreeValues) -> BinaryTree<i64> {
    BinaryTree::from_values(values.values.iter().copied())
}

fn require_value(tree: &BinaryTree<i64>, value: i64) -> CliResult<generational_arena::Index> {
    tree.find(&value)
        .ok_or_else(|| DomainError::UnknownNode(value.to_string()).into())
}

#[instrument(skip(settings))]
fn _tree(command: &TreeCommands, settings: &Settings) -> CliResult<()> {
    match command {
        TreeCommands::Traverse { tree, order } => {
            let order = match order {
                Some(order) => *order,
                None => settings.traversal_order()?,
            };
            debug!(%order, "traversing");
            output::info(&bst(tree).values(order).iter().join(" "));
        }
        TreeCommands::Minimal { sorted } => {
            let tree = BinaryTree::minimal(sorted)?;
            output::info(&tree.to_tree_string());
            output::action("height", &tree.height());
        }
        TreeCommands::Show { tree } => output::info(&bst(tree).to_tree_string()),
        TreeCommands::Rebalance { tree } => {
            let tree = bst(tree);
            let balanced = tree.rebalance()?;
            output::action("height", &format!("{} -> {}", tree.height(), balanced.height()));
            output::info(&balanced.to_tree_string());
        }
        TreeCommands::Check { tree } => {
            let tree = bst(tree);
            output::verdict(tree.is_balanced(), "balanced");
            output::verdict(tree.is_complete(), "complete");
            output::verdict(tree.is_full(), "full");
            output::verdict(tree.is_perfect(), "perfect");
            output::verdict(tree.is_valid_bst(), "valid BST");
        }
        TreeCommands::Lca { tree, first, second } => {
            let tree = bst(tree);
            let a = require_value(&tree, *first)?;
            let b = require_value(&tree, *second)?;
            let lca = tree.lowest_common_ancestor(a, b)?;
            if let Some(value) = tree.value(lca) {
                output::info(value);
            }
        }
        TreeCommands::Successor { tree, of } => {
            let tree = bst(tree);
            let idx = require_value(&tree, *of)?;
            match tree.successor(idx)?.and_then(|s| tree.value(s)) {
                Some(value) => output::info(value),
                None => output::info("none"),
            }
        }
        TreeCommands::Depths { tree, depth } => {
            let tree = bst(tree);
            match depth {
                Some(k) => {
                    let values: Vec<&i64> =
                        tree.nodes_at_depth(*k).into_iter().filter_map(|i| tree.value(i)).collect();
                    output::info(&values.iter().join(" "));
                }
                None => {
                    for (depth, level) in tree.list_of_depths().iter().enumerate() {
                        output::action(&depth.to_string(), &level.iter().join(" "));
                    }
                }
            }
        }
        TreeCommands::Sequences { tree, limit } => {
            let tree = bst(tree);
            let limit = limit.unwrap_or(settings.sequence_limit);
            output::action("count", &tree.count_bst_sequences()?);
            for sequence in tree.bst_sequences(limit) {
                output::detail(&sequence.iter().join(" "));
            }
        }
    }
    Ok(())
}

#[instrument]
fn _pyramid(width: u32) -> CliResult<()> {
    for row in Pyramid::new(width) {
        output::info(&row);
    }
    Ok(())
}

/// The fixed demonstration: sample inputs from each exercise, answers printed.
#[instrument]
fn _demo() -> CliResult<()> {
    output::header("strings");
    for text in ["abcdefg", "abcdafg", "aaaaaaa"] {
        output::verdict(strings::is_unique(text), &format!("{text} is unique"));
    }
    for (a, b) in [("abcdefg", "gbdfcea"), ("abcdefg", "sffeced")] {
        output::verdict(strings::check_permutation(a, b), &format!("{a} & {b} are permutations"));
    }
    output::action("urlify", &strings::urlify("Mr John Smith"));
    output::verdict(
        strings::is_permutation_of_palindrome("Tact Coa"),
        "\"Tact Coa\" is a permutation of a palindrome",
    );

    output::header("graph");
    let matrix: Vec<Vec<u8>> = vec![
        vec![0, 1, 0, 0, 1, 1],
        vec![0, 0, 0, 1, 1, 0],
        vec![0, 1, 0, 0, 0, 0],
        vec![0, 0, 1, 0, 1, 0],
        vec![0, 0, 0, 0, 0, 0],
        vec![0, 0, 0, 0, 0, 0],
    ];
    let names: Vec<String> = (0..matrix.len()).map(|i| i.to_string()).collect();
    let graph = Graph::from_adjacency_matrix(&matrix, &names)?;
    output::action("bfs", &graph.breadth_first(None).map(|(_, n)| &n.name).join(" "));
    output::action("dfs", &graph.depth_first(None).map(|(_, n)| &n.name).join(" "));
    let (two, four) = (graph.require_name("2")?, graph.require_name("4")?);
    output::verdict(graph.route_between(two, four)?, "route from 2 to 4");
    output::verdict(graph.route_between(four, two)?, "route from 4 to 2");

    let projects = ["a", "b", "c", "d", "e", "f"];
    let deps = [("a", "d"), ("f", "b"), ("b", "d"), ("f", "a"), ("d", "c")];
    output::action("build order", &build_order(&projects, &deps)?.join(", "));

    output::header("binary tree");
    let tree = BinaryTree::from_values([10, 12, 15, 8, 9, 4]);
    output::info(&tree.to_tree_string());
    for order in [
        TraversalOrder::ReverseInOrder,
        TraversalOrder::PreOrder,
        TraversalOrder::PostOrder,
    ] {
        output::action(&order.to_string(), &tree.values(order).iter().join(" "));
    }

    let minimal = BinaryTree::minimal(&[2, 4, 6, 8, 10, 20])?;
    output::info(&minimal.to_tree_string());
    for order in [TraversalOrder::InOrder, TraversalOrder::PreOrder, TraversalOrder::PostOrder] {
        output::action(&order.to_string(), &minimal.values(order).iter().join(" "));
    }
    output::verdict(minimal.is_balanced(), "minimal tree is balanced");
    output::action("bst sequences", &minimal.count_bst_sequences()?);

    output::header("pyramid");
    for row in Pyramid::new(4) {
        output::info(&row);
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _config(
    command: &ConfigCommands,
    settings: &Settings,
    explicit: Option<&Path>,
) -> CliResult<()> {
    let path: Option<PathBuf> = explicit.map(Path::to_path_buf).or_else(global_config_path);
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => match &path {
            Some(p) => output::info(&p.display()),
            None => output::info("no config directory available"),
        },
        ConfigCommands::Init { force } => {
            let path = path.ok_or_else(|| {
                CliError::InvalidArgs("no config directory available, pass --config".to_string())
            })?;
            if path.exists() && !force {
                return Err(CliError::InvalidArgs(format!(
                    "{} exists, use --force to overwrite",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)
                    .map_err(|e| CliError::io(format!("create {}", dir.display()), e))?;
            }
            fs::write(&path, Settings::template())
                .map_err(|e| CliError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
    }
    Ok(())
}
