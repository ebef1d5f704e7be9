// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Piper worker process entry point.
//!
//! Forked by the runtime's supervisor, one process per executor slot
//! (§5 "Scheduling"). Not a user-facing CLI — see [`piper_daemon::launch_args`].

use std::sync::Arc;

use piper_adapters::logger::LogDestination;
use piper_adapters::{LoggerReconfigurator, NixResourceBinder, NoopTracingSink, PipeChannel};
use piper_core::ExecutorConfig;
use piper_daemon::{LaunchArgs, ProcessTaskDispatcher};
use piper_engine::exception_channel::FileExceptionChannel;
use piper_engine::{bootstrap, Executor, ExecutorExit, NoStorageBootstrap};

fn print_usage() {
    println!("piper-worker {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("USAGE:");
    println!("    {}", piper_daemon::launch_args::USAGE);
    println!();
    println!("The worker is started by the runtime's supervisor and should not be");
    println!("invoked directly.");
}

fn load_config(path: &std::path::Path) -> Result<ExecutorConfig, Box<dyn std::error::Error>> {
    let file = std::fs::File::open(path)?;
    let config = serde_json::from_reader(file)?;
    Ok(config)
}

fn main() {
    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    if let [first] = raw_args.as_slice() {
        if first == "--help" || first == "-h" {
            print_usage();
            return;
        }
        if first == "--version" || first == "-v" {
            println!("piper-worker {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    }

    let launch = match LaunchArgs::parse(&raw_args) {
        Ok(launch) => launch,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let config = match load_config(&launch.config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: failed to load config {:?}: {err}", launch.config_path);
            std::process::exit(1);
        }
    };

    let process_target: &'static str = Box::leak(format!("{}::process", config.logger_name).into_boxed_str());
    let storage_targets: Vec<&'static str> = config
        .storage_loggers
        .iter()
        .map(|name| -> &'static str { Box::leak(name.clone().into_boxed_str()) })
        .collect();
    let level = if config.debug {
        tracing::level_filters::LevelFilter::DEBUG
    } else {
        tracing::level_filters::LevelFilter::INFO
    };
    let (reconfigurator, layers) =
        LoggerReconfigurator::new(process_target, level, LogDestination::Stderr, &storage_targets);

    let process_log_path = config.tmp_dir.join(format!("{}.log", launch.process_name));
    let _log_guard = match piper_daemon::logging::install(&process_log_path, layers) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("error: failed to set up logging: {err}");
            std::process::exit(1);
        }
    };

    let exception_channel = Arc::new(FileExceptionChannel::new(launch.exception_queue.clone()));

    let bootstrap_outcome = bootstrap(
        &config,
        false,
        &reconfigurator,
        &NoStorageBootstrap,
        |master_ip, master_port| {
            Arc::new(piper_adapters::TcpStreamTransport::connect(master_ip, master_port).unwrap_or_else(|err| {
                tracing::error!(%err, "failed to connect to streaming backend");
                std::process::exit(1);
            })) as Arc<dyn piper_adapters::StreamTransport>
        },
    );

    let bootstrap_outcome = match bootstrap_outcome {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(%err, "worker bootstrap failed");
            if let Err(post_err) = exception_channel.post_exception() {
                tracing::error!(%post_err, "failed to post bootstrap failure to supervisor queue");
            }
            std::process::exit(1);
        }
    };

    let pipe = PipeChannel::new(launch.input_pipe.clone(), launch.output_pipe.clone());
    let dispatcher = Arc::new(ProcessTaskDispatcher::new(launch.task_runner_path.clone()));
    let resource_binder = Arc::new(NixResourceBinder::new());
    let tracing_sink: Arc<dyn piper_adapters::TracingSink> = if config.tracing_enabled {
        Arc::new(piper_adapters::EventsTracingSink::new())
    } else {
        Arc::new(NoopTracingSink::new())
    };

    let mut executor = Executor::new(
        pipe,
        config,
        launch.process_name.clone(),
        resource_binder,
        dispatcher,
        tracing_sink,
        reconfigurator,
        exception_channel,
        bootstrap_outcome.sigterm,
    );

    let exit = executor.run();

    if let Some(streaming) = bootstrap_outcome.streaming {
        streaming.set_stop();
    }

    if exit == ExecutorExit::Quit {
        if let Err(err) = executor.write_quit_reply() {
            tracing::error!(%err, "failed to write QUIT reply");
        }
    }

    std::process::exit(match exit {
        ExecutorExit::Quit => 0,
        ExecutorExit::Faulted => 1,
    });
}

