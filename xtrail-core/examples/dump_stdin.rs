//! Read an XML document from stdin and print its structural trace.

use std::io;

use xtrail_core::{Cursor, Dumper};

fn main() {
    let stdin = io::stdin();
    let mut cursor = Cursor::from_reader(stdin.lock()).unwrap();
    let mut out = io::stdout();
    Dumper::new().dump(&mut cursor, &mut out).unwrap();
}
