//! GPX 1.1: one `<trk>` per track, one `<trkseg>` per segment

use std::io::{self, Write};

use super::Layout;
use crate::coord::fixed_point_to_decimal;
use crate::location::Location;

const HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<gpx xmlns=\"http://www.topografix.com/GPX/1/1\" version=\"1.1\" creator=\"takeout2track\" ",
    "xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" ",
    "xsi:schemaLocation=\"http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd\">\n",
    "\t<metadata>\n",
    "\t\t<name>Location History</name>\n",
    "\t</metadata>\n",
    "\t<trk>\n",
    "\t\t<trkseg>",
);

const NEW_TRACK: &str = "\n\t\t</trkseg>\n\t</trk>\n\t<trk>\n\t\t<trkseg>";

const NEW_SEGMENT: &str = "\n\t\t</trkseg>\n\t\t<trkseg>";

const FOOTER: &str = "\n\t\t</trkseg>\n\t</trk>\n</gpx>\n";

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
        "\n\t\t\t<trkpt lat=\"{}\" lon=\"{}\">\n\t\t\t\t<time>{}</time>\n\t\t\t\t<accuracy>{}</accuracy>\n\t\t\t</trkpt>",
        fixed_point_to_decimal(&loc.latitude),
        fixed_point_to_decimal(&loc.longitude),
        loc.timestamp,
        loc.accuracy,
    )
}

#[cfg(test)]
mod tests {
    use super::super::{OutputFormat, render_to_string, sample_location};

    #[test]
    fn test_gpx_point() {
        let out = render_to_string(OutputFormat::Gpx, &[sample_location()]);
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<gpx "));
        assert!(out.contains(
            "\t\t\t<trkpt lat=\"50.6553765\" lon=\"-3.0632229\">\n\t\t\t\t<time>2012-01-27T21:14:42.352Z</time>\n\t\t\t\t<accuracy>24</accuracy>\n\t\t\t</trkpt>"
        ));
        assert!(out.ends_with("</trkpt>\n\t\t</trkseg>\n\t</trk>\n</gpx>\n"));
    }

    #[test]
    fn test_gpx_tracks_and_segments() {
        let loc = sample_location();
        let out = render_to_string(OutputFormat::Gpx, &[loc.clone(), loc.clone(), loc]);
        assert_eq!(out.matches("<trk>").count(), 2);
        assert_eq!(out.matches("<trkseg>").count(), 3);
        assert_eq!(out.matches("</trkseg>").count(), 3);
        assert_eq!(out.matches("<trkpt ").count(), 3);
    }
}
