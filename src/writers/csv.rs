//! CSV: `timestamp,lat,lon,accuracy`, one row per point

use std::io::{self, Write};

use super::Layout;
use crate::coord::fixed_point_to_decimal;
use crate::location::Location;

pub(super) const LAYOUT: Layout = Layout {
    header: "timestamp,lat,lon,accuracy\n",
    new_segment: "",
    new_track: "",
    footer: "",
    render,
};

fn render(out: &mut dyn Write, loc: &Location) -> io::Result<()> {
    writeln!(
        out,
        "{},{},{},{}",
        loc.timestamp,
        fixed_point_to_decimal(&loc.latitude),
        fixed_point_to_decimal(&loc.longitude),
        loc.accuracy
    )
}
