//! Trace parsing tests.

use std::io::Write;

use cachesim_core::common::{AccessType, PhysAddr, TraceError};
use cachesim_core::sim::trace::{self, TraceReader, TraceRecord, parse_line};
use rstest::rstest;

#[test]
fn parses_load_record() {
    assert_eq!(
        parse_line("# 0 7fffed80 1", 1).unwrap(),
        TraceRecord {
            marker: '#',
            access: AccessType::Load,
            addr: PhysAddr(0x7fff_ed80),
            instructions: 1,
        }
    );
}

#[test]
fn parses_store_with_prefix_and_extra_spacing() {
    let record = parse_line("  s\t1   0X1001000c   12 ", 3).unwrap();
    assert_eq!(record.marker, 's');
    assert_eq!(record.access, AccessType::Store);
    assert_eq!(record.addr, PhysAddr(0x1001_000c));
    assert_eq!(record.instructions, 12);
}

#[test]
fn parses_full_width_address() {
    let record = parse_line("# 0 ffffffffffffffff 0", 1).unwrap();
    assert_eq!(record.addr, PhysAddr(u64::MAX));
    assert_eq!(record.instructions, 0);
}

#[rstest]
#[case("# 0 7fff", "missing instruction count")]
#[case("#", "missing access type")]
#[case("# 2 10 1", "access type `2` is not 0 or 1")]
#[case("# x 10 1", "access type `x` is not 0 or 1")]
#[case("# 0 zz 1", "address `zz`")]
#[case("# 0 10 -1", "instruction count `-1`")]
#[case("# 0 10 1 extra", "unexpected trailing field `extra`")]
#[case("## 0 10 1", "marker `##` is not a single character")]
fn rejects_malformed_lines(#[case] line: &str, #[case] reason_prefix: &str) {
    match parse_line(line, 17) {
        Err(TraceError::Malformed { line, reason }) => {
            assert_eq!(line, 17);
            assert!(
                reason.starts_with(reason_prefix),
                "reason `{reason}` should start with `{reason_prefix}`"
            );
        }
        other => panic!("expected malformed error, got {other:?}"),
    }
}

#[test]
fn reader_skips_blank_lines_and_counts_them() {
    let input = "# 0 10 1\n\n   \n# 1 20 2\n";
    let mut reader = TraceReader::new(input.as_bytes());
    assert_eq!(reader.next().unwrap().unwrap().addr, PhysAddr(0x10));
    let second = reader.next().unwrap().unwrap();
    assert_eq!(second.access, AccessType::Store);
    assert_eq!(reader.line_no(), 4);
    assert!(reader.next().is_none());
}

#[test]
fn reader_handles_missing_trailing_newline_and_crlf() {
    let input = "# 0 10 1\r\n# 0 20 1";
    let records: Vec<_> = TraceReader::new(input.as_bytes())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].addr, PhysAddr(0x20));
}

#[test]
fn reader_reports_line_number_of_bad_record() {
    let input = "# 0 10 1\n\n# 0 nothex 1\n# 0 30 1\n";
    let results: Vec<_> = TraceReader::new(input.as_bytes()).collect();
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(TraceError::Malformed { line: 3, .. })
    ));
}

#[test]
fn open_reads_trace_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# 0 1000 1").unwrap();
    writeln!(file, "# 1 1000 3").unwrap();
    file.flush().unwrap();

    let records: Vec<TraceRecord> = trace::open(file.path())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].instructions, 3);
}

#[test]
fn open_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = trace::open(dir.path().join("absent.trace"));
    assert!(matches!(result, Err(TraceError::Io(_))));
}
