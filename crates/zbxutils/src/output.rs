use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use zbxutils_frame::Frame;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Raw
        }
    }
}

/// One answered item key.
#[derive(Serialize, Debug)]
pub struct ItemOutput<'a> {
    pub host: &'a str,
    pub port: u16,
    pub key: &'a str,
    pub value: String,
    pub size: usize,
    pub supported: bool,
}

impl<'a> ItemOutput<'a> {
    pub fn from_frame(host: &'a str, port: u16, key: &'a str, frame: &Frame) -> Self {
        Self {
            host,
            port,
            key,
            value: frame.text().into_owned(),
            size: frame.data.len(),
            supported: frame.is_supported(),
        }
    }

    pub fn from_text(host: &'a str, port: u16, key: &'a str, value: String) -> Self {
        Self {
            host,
            port,
            key,
            size: value.len(),
            value,
            supported: true,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct PingOutput<'a> {
    pub host: &'a str,
    pub port: u16,
    pub pingable: bool,
}

pub fn print_item(item: &ItemOutput<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(item),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["AGENT", "KEY", "SIZE", "VALUE"])
                .add_row(vec![
                    format!("{}:{}", item.host, item.port),
                    item.key.to_string(),
                    item.size.to_string(),
                    item.value.clone(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "agent={}:{} key={} size={} value={}",
                item.host, item.port, item.key, item.size, item.value
            );
        }
        OutputFormat::Raw => println!("{}", item.value),
    }
}

pub fn print_ping(out: &PingOutput<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["AGENT", "PINGABLE"])
                .add_row(vec![
                    format!("{}:{}", out.host, out.port),
                    out.pingable.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("agent={}:{} pingable={}", out.host, out.port, out.pingable);
        }
        OutputFormat::Raw => println!("{}", u8::from(out.pingable)),
    }
}

/// Write frame data to stdout byte for byte.
pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.write_all(b"\n");
    let _ = out.flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}
