/// Formats `buffer` as a hex dump, labelling the first byte as `start`.
pub fn hexdump(buffer: &[u8], start: u16) -> String {
    let mut str = String::new();
    let mut addr = start;
    for chunk in buffer.chunks(16) {
        let mut line = format!("{:04x}: ", addr);
        let mut chars = String::new();
        for &byte in chunk {
            line.push_str(&format!("{:02x} ", byte));
            let c = byte as char;
            chars.push(if c.is_ascii_graphic() || c == ' ' {
                c
            } else {
                '.'
            });
        }

        let dump_line = format!("{:<54} {}\n", line, chars);
        str.push_str(&dump_line);

        addr = addr.wrapping_add(16);
    }

    str
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hexdump() {
        let dump = hexdump(b"Bomb Jack\x00\x01", 0x9000);
        assert!(dump.starts_with("9000: 42 6f 6d 62 20 4a 61 63 6b 00 01 "));
        assert!(dump.trim_end().ends_with("Bomb Jack.."));
        assert_eq!(dump.lines().count(), 1);
    }

    #[test]
    fn test_hexdump_multiple_lines() {
        let dump = hexdump(&[0u8; 20], 0xFFF8);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("0008: "));
    }
}
