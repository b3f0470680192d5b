// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

use crate::summary::MAX_TREND_MONTHS;

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON value per line"),
    )
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Calendar month (defaults to the current month)")
}

fn tx_entry_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("type")
            .long("type")
            .required(true)
            .value_parser(["income", "expense"]),
    )
    .arg(Arg::new("vendor").long("vendor").required(true))
    .arg(
        Arg::new("amount")
            .long("amount")
            .required(true)
            .allow_hyphen_values(true)
            .help("Base amount before GST"),
    )
    .arg(
        Arg::new("gst_rate")
            .long("gst-rate")
            .default_value("18")
            .help("GST slab in percent: 0, 5, 12, 18 or 28"),
    )
    .arg(
        Arg::new("date")
            .long("date")
            .value_name("YYYY-MM-DD")
            .help("Business date (defaults to today)"),
    )
    .arg(Arg::new("category").long("category"))
    .arg(Arg::new("description").long("description"))
}

pub fn build_cli() -> Command {
    Command::new("gstledger")
        .about("Small-business bookkeeping with GST-aware summaries")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the ledger database"))
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-user").arg(Arg::new("user").required(true)),
                )
                .subcommand(
                    Command::new("set-currency").arg(Arg::new("symbol").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage expense categories")
                .subcommand(Command::new("add").arg(Arg::new("name").long("name").required(true)))
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(tx_entry_args(Command::new("add")))
                .subcommand(json_args(
                    Command::new("list")
                        .arg(month_arg())
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_args(Command::new("recent")))
                .subcommand(
                    Command::new("draft")
                        .about("Build a transaction from a bill-extraction reply or a voice transcript")
                        .arg(Arg::new("bill").long("bill").value_name("JSON_FILE"))
                        .arg(Arg::new("voice").long("voice").value_name("TRANSCRIPT"))
                        .group(
                            ArgGroup::new("source")
                                .args(["bill", "voice"])
                                .required(true),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                        .arg(
                            Arg::new("save")
                                .long("save")
                                .action(ArgAction::SetTrue)
                                .help("Validate and record the draft"),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Period summaries and analytics")
                .subcommand(json_args(Command::new("month").arg(month_arg())))
                .subcommand(json_args(
                    Command::new("year").arg(
                        Arg::new("year")
                            .long("year")
                            .value_parser(value_parser!(i32)),
                    ),
                ))
                .subcommand(json_args(
                    Command::new("trend").arg(
                        Arg::new("months")
                            .long("months")
                            .value_parser(value_parser!(u64).range(1..=MAX_TREND_MONTHS as u64))
                            .default_value("12"),
                    ),
                ))
                .subcommand(json_args(
                    Command::new("categories").arg(month_arg()).arg(
                        Arg::new("top")
                            .long("top")
                            .value_parser(value_parser!(usize))
                            .default_value("5"),
                    ),
                ))
                .subcommand(json_args(Command::new("growth").arg(month_arg()))),
        )
        .subcommand(json_args(
            Command::new("dashboard").about("Current month at a glance"),
        ))
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .value_parser(["csv", "json"]),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Check stored GST figures"))
}
