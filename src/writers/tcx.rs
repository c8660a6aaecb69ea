//! TCX v2: one `<Course>` per track, one `<Track>` per segment

use std::io::{self, Write};

use super::Layout;
use crate::coord::fixed_point_to_decimal;
use crate::location::Location;

const HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\" ?>\n",
    "<TrainingCenterDatabase xmlns=\"http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2\" ",
    "xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" ",
    "xsi:schemaLocation=\"http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2 ",
    "http://www.garmin.com/xmlschemas/TrainingCenterDatabasev2.xsd\">\n",
    "\t<Courses>\n",
    "\t\t<Course>\n",
    "\t\t\t<Name>New Course</Name>\n",
    "\t\t\t<Track>",
);

const NEW_TRACK: &str = "\n\t\t\t</Track>\n\t\t</Course>\n\t\t<Course>\n\t\t\t<Track>";

const NEW_SEGMENT: &str = "\n\t\t\t</Track>\n\t\t\t<Track>";

const FOOTER: &str = "\n\t\t\t</Track>\n\t\t</Course>\n\t</Courses>\n</TrainingCenterDatabase>\n";

pub(super) const LAYOUT: Layout = Layout {
    header: HEADER,
    new_segment: NEW_SEGMENT,
    new_track: NEW_TRACK,
    footer: FOOTER,
    render,
};

fn render(out: &mut dyn Write, loc: &Location) -> io::Result<()> {
    write!(
        out,
        concat!(
            "\n\t\t\t\t<Trackpoint>",
            "\n\t\t\t\t\t<Time>{}</Time>",
            "\n\t\t\t\t\t<Position>",
            "\n\t\t\t\t\t\t<LatitudeDegrees>{}</LatitudeDegrees>",
            "\n\t\t\t\t\t\t<LongitudeDegrees>{}</LongitudeDegrees>",
            "\n\t\t\t\t\t</Position>",
            "\n\t\t\t\t</Trackpoint>",
        ),
        loc.timestamp,
        fixed_point_to_decimal(&loc.latitude),
        fixed_point_to_decimal(&loc.longitude),
    )
}
