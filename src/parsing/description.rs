use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Info,
    Concert,
    Group,
}

const FIELDS: [(&str, Field); 3] = [
    ("Info: ", Field::Info),
    ("Concert: ", Field::Concert),
    ("Group: ", Field::Group),
];

const SEGMENT_SEPARATOR: &str = "\n\n";
const GROUP_SEPARATOR: &str = ", ";

/// Structured metadata carried in an event's free-text DESCRIPTION.
///
/// The description is a series of blank-line separated segments; a segment starting
/// with `Info: `, `Concert: ` or `Group: ` sets that field (later segments win), and
/// anything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Description {
    pub info: String,
    pub concert: String,
    pub groups: BTreeSet<String>,
}

impl Description {
    pub fn parse(text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n");
        let mut description = Self::default();

        for segment in normalized.split(SEGMENT_SEPARATOR) {
            let Some((field, value)) = FIELDS
                .iter()
                .find_map(|(prefix, field)| segment.strip_prefix(*prefix).map(|rest| (*field, rest)))
            else {
                continue;
            };

            match field {
                Field::Info => description.info = value.to_string(),
                Field::Concert => description.concert = value.to_string(),
                Field::Group => {
                    description.groups = value
                        .split(GROUP_SEPARATOR)
                        .map(str::trim)
                        .filter(|group| !group.is_empty())
                        .map(str::to_string)
                        .collect()
                }
            }
        }

        description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_known_segments() {
        let description = Description::parse(
            "Concert: Winter Concert\n\nGroup: Sopranos, Altos\n\nInfo: Black attire",
        );
        assert_eq!(description.concert, "Winter Concert");
        assert_eq!(description.info, "Black attire");
        assert_eq!(
            description.groups,
            BTreeSet::from(["Altos".to_string(), "Sopranos".to_string()])
        );
    }

    #[test]
    fn ignores_unknown_segments_and_crlf() {
        let description =
            Description::parse("Notes: bring a pencil\r\n\r\nInfo: Room 2B\r\n\r\nAttendance: required");
        assert_eq!(description.info, "Room 2B");
        assert_eq!(description.concert, "");
        assert!(description.groups.is_empty());
    }

    #[test]
    fn later_segments_override_earlier_ones() {
        let description = Description::parse("Info: first\n\nInfo: second");
        assert_eq!(description.info, "second");
    }

    #[test]
    fn prefix_must_start_the_segment() {
        let description = Description::parse("See Info: elsewhere\n\n Group: Tenors");
        assert_eq!(description, Description::default());
    }

    #[test]
    fn empty_text_yields_defaults() {
        assert_eq!(Description::parse(""), Description::default());
    }
}
