//! Fixed-width table rendering.

use std::fmt;
use std::io::{self, Write};

use macaddr::MacAddr6;

use super::{Report, ReportRow};

const NUMBER_WIDTH: usize = 5;
const MAC_WIDTH: usize = 20;
const IP_WIDTH: usize = 20;
const PORT_WIDTH: usize = 10;

/// Shown in port columns when the frame carried no TCP segment.
pub const PORT_PLACEHOLDER: &str = "-";

/// Format a MAC address as lowercase colon-separated hex (aa:bb:cc:dd:ee:ff).
pub fn format_mac(mac: &MacAddr6) -> String {
    mac.to_string().to_lowercase()
}

fn format_port(port: Option<u16>) -> String {
    port.map(|p| p.to_string())
        .unwrap_or_else(|| PORT_PLACEHOLDER.to_string())
}

#[allow(clippy::too_many_arguments)]
fn write_line(
    f: &mut fmt::Formatter<'_>,
    number: &str,
    src_mac: &str,
    dst_mac: &str,
    src_ip: &str,
    dst_ip: &str,
    src_port: &str,
    dst_port: &str,
) -> fmt::Result {
    // Widths are minimums, so oversized values push the line out rather than truncate.
    writeln!(
        f,
        "{:>nw$}{:>mw$}{:>mw$}{:>iw$}{:>iw$}{:>pw$}{:>pw$}",
        number,
        src_mac,
        dst_mac,
        src_ip,
        dst_ip,
        src_port,
        dst_port,
        nw = NUMBER_WIDTH,
        mw = MAC_WIDTH,
        iw = IP_WIDTH,
        pw = PORT_WIDTH,
    )
}

fn write_row(f: &mut fmt::Formatter<'_>, row: &ReportRow) -> fmt::Result {
    let record = &row.record;
    write_line(
        f,
        &row.number.to_string(),
        &format_mac(&record.src_mac),
        &format_mac(&record.dst_mac),
        &record.src_ip.to_string(),
        &record.dst_ip.to_string(),
        &format_port(record.src_port),
        &format_port(record.dst_port),
    )
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_line(
            f,
            "No.",
            "Source MAC",
            "Dest MAC",
            "Source IP",
            "Dest IP",
            "Src Port",
            "Dest Port",
        )?;

        for row in self.rows() {
            write_row(f, row)?;
        }

        writeln!(f)?;
        writeln!(f, "Unprocessed packets: {}", self.unprocessed())
    }
}

impl Report {
    /// Render the table into a writer.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self)?;
        out.flush()
    }
}
