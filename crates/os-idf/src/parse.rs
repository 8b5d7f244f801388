//! IDF text reader.

use crate::idd::IddObjectType;
use crate::object::IdfObject;
use crate::workspace::Workspace;
use crate::{IdfError, IdfResult};

/// Parse IDF text into a workspace.
///
/// `!` starts a comment that runs to end of line. Fields are separated by
/// `,`, a record ends at `;`, and surrounding whitespace is trimmed. The
/// first field of a record is its type.
pub fn parse_idf(text: &str) -> IdfResult<Workspace> {
    let mut workspace = Workspace::new();
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut record_line = 0usize;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.split('!').next().unwrap_or_default();
        for ch in line.chars() {
            match ch {
                ',' | ';' => {
                    if tokens.is_empty() && current.trim().is_empty() {
                        return Err(IdfError::Parse {
                            line: line_no,
                            what: "record has no object type".to_string(),
                        });
                    }
                    if tokens.is_empty() {
                        record_line = line_no;
                    }
                    tokens.push(current.trim().to_string());
                    current.clear();
                    if ch == ';' {
                        workspace.add_object(finish_record(std::mem::take(&mut tokens)));
                    }
                }
                _ => {
                    if tokens.is_empty() && current.trim().is_empty() && !ch.is_whitespace() {
                        record_line = line_no;
                    }
                    current.push(ch);
                }
            }
        }
        current.push(' ');
    }

    if !tokens.is_empty() || !current.trim().is_empty() {
        return Err(IdfError::Parse {
            line: record_line,
            what: "unterminated record (missing ';')".to_string(),
        });
    }
    Ok(workspace)
}

fn finish_record(mut tokens: Vec<String>) -> IdfObject {
    let type_name = tokens.remove(0);
    IdfObject::with_fields(IddObjectType::from_name(&type_name), tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiline_records_with_comments() {
        let text = "\
! header comment
Version,9.6;

Zone,
  Office,     !- Name
  0,          !- Direction of Relative North
  ,
  ;
";
        let ws = parse_idf(text).unwrap();
        assert_eq!(ws.len(), 2);
        let zone = &ws.objects[1];
        assert_eq!(zone.object_type, IddObjectType::Zone);
        assert_eq!(zone.fields, vec!["Office", "0", "", ""]);
        assert_eq!(zone.name(), Some("Office"));
    }

    #[test]
    fn several_records_on_one_line() {
        let ws = parse_idf("NodeList,A,n1;NodeList,B,n2,n3;").unwrap();
        assert_eq!(ws.len(), 2);
        assert_eq!(ws.objects[1].num_extensible_groups(), 2);
    }

    #[test]
    fn unknown_types_are_kept() {
        let ws = parse_idf("Output:Variable,*,Zone Mean Air Temperature,Hourly;").unwrap();
        let obj = &ws.objects[0];
        assert_eq!(obj.object_type.name(), "Output:Variable");
        assert!(!obj.object_type.is_known());
        assert_eq!(obj.fields.len(), 3);
    }

    #[test]
    fn unterminated_record_reports_its_start() {
        let err = parse_idf("Version,9.6;\n\nZone,\n  Office,\n").unwrap_err();
        match err {
            IdfError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn empty_type_is_rejected() {
        let err = parse_idf("Version,9.6;\n  , Office;\n").unwrap_err();
        assert!(matches!(err, IdfError::Parse { line: 2, .. }));
    }
}
