//! KML 2.2: a flat list of placemarks

use std::io::{self, Write};

use super::Layout;
use crate::coord::fixed_point_to_decimal;
use crate::location::Location;

const HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n",
    "\t<Document>\n",
    "\t\t<name>Location History</name>",
);

const FOOTER: &str = "\n\t</Document>\n</kml>\n";

pub(super) const LAYOUT: Layout = Layout {
    header: HEADER,
    new_segment: "",
    new_track: "",
    footer: FOOTER,
    render,
};

fn render(out: &mut dyn Write, loc: &Location) -> io::Result<()> {
    write!(
        out,
        concat!(
            "\n\t\t<Placemark>",
            "\n\t\t\t<TimeStamp><when>{}</when></TimeStamp>",
            "\n\t\t\t<ExtendedData>",
            "\n\t\t\t\t<Data name=\"accuracy\"><value>{}</value></Data>",
            "\n\t\t\t</ExtendedData>",
            "\n\t\t\t<Point><coordinates>{},{}</coordinates></Point>",
            "\n\t\t</Placemark>",
        ),
        loc.timestamp,
        loc.accuracy,
        fixed_point_to_decimal(&loc.longitude),
        fixed_point_to_decimal(&loc.latitude),
    )
}
