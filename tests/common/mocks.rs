//! Mock output sink standing in for stdout.
use mockall::mock;

use std::io::{self, Write};

mock! {
    pub Console {}
    impl Write for Console {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
}
