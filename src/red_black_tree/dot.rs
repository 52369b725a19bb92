use crate::red_black_tree::RedBlackSet;
use crate::Result;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

impl<T> RedBlackSet<T>
where
    T: Display,
{
    /// Writes the tree in Graphviz dot format. Each value becomes a node filled with its color,
    /// followed by edges labelled `L` and `R` to its children. Nodes appear in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// set.insert(2).unwrap();
    ///
    /// let mut out = Vec::new();
    /// set.dump(&mut out).unwrap();
    /// assert_eq!(
    ///     String::from_utf8(out).unwrap(),
    ///     concat!(
    ///         "digraph RBTree {\n",
    ///         "    node [style=filled, fontcolor=white];\n",
    ///         "    \"1\" [fillcolor=black];\n",
    ///         "    \"1\" -> \"2\" [label=\"R\"];\n",
    ///         "    \"2\" [fillcolor=red];\n",
    ///         "}\n",
    ///     ),
    /// );
    /// ```
    pub fn dump<W>(&self, writer: &mut W) -> Result<()>
    where
        W: Write,
    {
        let tree = self.tree();
        writeln!(writer, "digraph RBTree {{")?;
        writeln!(writer, "    node [style=filled, fontcolor=white];")?;
        for handle in tree.in_order() {
            let node = tree.node(handle);
            writeln!(
                writer,
                "    \"{}\" [fillcolor={}];",
                node.value,
                node.color.name(),
            )?;
            for (label, child) in &[("L", node.left), ("R", node.right)] {
                if let Some(child) = child {
                    writeln!(
                        writer,
                        "    \"{}\" -> \"{}\" [label=\"{}\"];",
                        node.value,
                        tree.node(*child).value,
                        label,
                    )?;
                }
            }
        }
        writeln!(writer, "}}")?;
        Ok(())
    }

    /// Writes the dot dump to a newly created (or truncated) file at `path`.
    pub fn dump_to_file<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let mut writer = BufWriter::new(File::create(path)?);
        self.dump(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::red_black_tree::RedBlackSet;
    use crate::Error;
    use std::io::{self, Write};

    fn dump_string(set: &RedBlackSet<u32>) -> String {
        let mut out = Vec::new();
        set.dump(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_dump_empty() {
        let set: RedBlackSet<u32> = RedBlackSet::new();
        assert_eq!(
            dump_string(&set),
            "digraph RBTree {\n    node [style=filled, fontcolor=white];\n}\n",
        );
    }

    #[test]
    fn test_dump_balanced() {
        let set: RedBlackSet<u32> = vec![1, 2, 3].into_iter().collect();
        let expected = [
            "digraph RBTree {",
            "    node [style=filled, fontcolor=white];",
            "    \"1\" [fillcolor=red];",
            "    \"2\" [fillcolor=black];",
            "    \"2\" -> \"1\" [label=\"L\"];",
            "    \"2\" -> \"3\" [label=\"R\"];",
            "    \"3\" [fillcolor=red];",
            "}",
            "",
        ]
        .join("\n");
        assert_eq!(dump_string(&set), expected);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_dump_io_error() {
        let set: RedBlackSet<u32> = vec![1].into_iter().collect();
        match set.dump(&mut FailingWriter) {
            Err(Error::IOError(ref error)) => assert_eq!(error.to_string(), "disk full"),
            _ => panic!("expected an io error"),
        }
    }
}
