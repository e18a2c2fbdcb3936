//! cli::commands
//!
//! Command handlers: each takes the shared [`Locker`] plus its parsed
//! arguments, performs one locking operation, and reports the outcome on
//! stdout.

use std::process::ExitCode;

use anyhow::Result;

use crate::cli::args::Command;
use crate::locker::Locker;

/// Dispatch a parsed command.
pub fn dispatch(command: Command, locker: &Locker) -> Result<ExitCode> {
    match command {
        Command::Acquire { path } => acquire(locker, &path),
        Command::Release { path } => release(locker, &path),
        Command::Status { path } => status(locker, &path),
        Command::Members { namespace } => members(locker, &namespace),
        Command::Size { namespace, raw } => size(locker, &namespace, raw),
        Command::FlushExpired { namespace } => flush_expired(locker, &namespace),
        Command::Flush { namespace } => flush(locker, &namespace),
        Command::Keys => keys(locker),
    }
}

fn acquire(locker: &Locker, path: &[String]) -> Result<ExitCode> {
    let lock = locker.lock(path)?;
    if lock.acquire()? {
        println!("acquired {}:{}", lock.lock_key(), lock.id());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("busy {}:{}", lock.lock_key(), lock.id());
        Ok(ExitCode::FAILURE)
    }
}

fn release(locker: &Locker, path: &[String]) -> Result<ExitCode> {
    let lock = locker.lock(path)?;
    if lock.release()? {
        println!("released {}:{}", lock.lock_key(), lock.id());
    } else {
        println!("not held {}:{}", lock.lock_key(), lock.id());
    }
    Ok(ExitCode::SUCCESS)
}

fn status(locker: &Locker, path: &[String]) -> Result<ExitCode> {
    let lock = locker.lock(path)?;
    if lock.is_locked()? {
        println!("locked {}:{}", lock.lock_key(), lock.id());
    } else {
        println!("free {}:{}", lock.lock_key(), lock.id());
    }
    Ok(ExitCode::SUCCESS)
}

fn members(locker: &Locker, namespace: &[String]) -> Result<ExitCode> {
    let dataset = locker.dataset(namespace)?;
    for id in dataset.members()? {
        println!("{id}");
    }
    Ok(ExitCode::SUCCESS)
}

fn size(locker: &Locker, namespace: &[String], raw: bool) -> Result<ExitCode> {
    let dataset = locker.dataset(namespace)?;
    let count = if raw {
        dataset.raw_size()?
    } else {
        dataset.size()?
    };
    println!("{count}");
    Ok(ExitCode::SUCCESS)
}

fn flush_expired(locker: &Locker, namespace: &[String]) -> Result<ExitCode> {
    let dataset = locker.dataset(namespace)?;
    if dataset.flush_expired_members()? {
        println!("flushed expired entries from {}", dataset.lock_key());
    } else {
        println!("nothing expired in {}", dataset.lock_key());
    }
    Ok(ExitCode::SUCCESS)
}

fn flush(locker: &Locker, namespace: &[String]) -> Result<ExitCode> {
    let dataset = locker.dataset(namespace)?;
    if dataset.flush()? {
        println!("flushed {}", dataset.lock_key());
    } else {
        println!("nothing stored at {}", dataset.lock_key());
    }
    Ok(ExitCode::SUCCESS)
}

fn keys(locker: &Locker) -> Result<ExitCode> {
    for key in locker.keys()? {
        println!("{key}");
    }
    Ok(ExitCode::SUCCESS)
}
