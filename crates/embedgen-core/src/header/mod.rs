//! C++ header assembly.
//!
//! [`HeaderAssembler`] renders a list of [`EmbeddedResource`]s into one
//! self-contained header: an include guard, a namespace, a `to_array`
//! shim for pre-C++20 compilers, and per resource, in order:
//!
//! | declaration                      | text mode     | binary mode        |
//! |----------------------------------|---------------|--------------------|
//! | `<id>_name`                      | yes           | yes                |
//! | `<id>` (single chunk)            | `string_view` | `char[]` + `_size` |
//! | `<id>__chunks` / `__blob_chunks` | count         | count              |
//! | `<id>__chunk_<i>`                | `string_view` |                    |
//! | `<id>__blob_chunk_<i>`           |               | `char[]` + `_size_<i>` |

mod writer;

use crate::chunk::{ChunkLayout, LiteralChunk};
use crate::encode::escape_text;
use crate::ident::EmbedMode;
use crate::resource::EmbeddedResource;
use std::fmt::Write as FmtWrite;

pub use writer::{ResourceWriter, StatsWriter};

/// Default include-guard macro
pub const DEFAULT_GUARD: &str = "EMBEDDED_RESOURCES_HEADER_FILE";

/// Default namespace for all declarations
pub const DEFAULT_NAMESPACE: &str = "embedded";

/// How each constant is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Linkage {
    /// `extern __declspec(selectany) constexpr` (MSVC)
    #[default]
    Selectany,
    /// `inline constexpr` (portable C++17)
    Inline,
}

impl Linkage {
    /// Declaration specifiers placed before the type
    pub fn as_str(&self) -> &'static str {
        match self {
            Linkage::Selectany => "extern __declspec(selectany) constexpr",
            Linkage::Inline => "inline constexpr",
        }
    }
}

/// Configuration for header rendering
#[derive(Debug, Clone)]
pub struct HeaderConfig {
    /// Include-guard macro name
    pub guard: String,
    /// Enclosing namespace
    pub namespace: String,
    /// Declaration specifiers
    pub linkage: Linkage,
    /// Indentation inside the namespace (default: one tab)
    pub indent_str: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            guard: DEFAULT_GUARD.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            linkage: Linkage::default(),
            indent_str: "\t".to_string(),
        }
    }
}

impl HeaderConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the include-guard macro
    pub fn guard(mut self, guard: impl Into<String>) -> Self {
        self.guard = guard.into();
        self
    }

    /// Sets the enclosing namespace
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the declaration linkage
    pub fn linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Sets the indentation string
    pub fn indent_str(mut self, s: impl Into<String>) -> Self {
        self.indent_str = s.into();
        self
    }
}

/// Renders resources into the final header text
#[derive(Debug, Clone, Default)]
pub struct HeaderAssembler {
    config: HeaderConfig,
}

impl HeaderAssembler {
    /// Creates an assembler with the given config
    pub fn new(config: HeaderConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &HeaderConfig {
        &self.config
    }

    /// Render the complete header as a string
    pub fn assemble(&self, resources: &[EmbeddedResource]) -> String {
        let mut output = String::new();
        self.write_to(resources, &mut output)
            .expect("String write cannot fail");
        output
    }

    /// Write the complete header to a writer
    pub fn write_to(
        &self,
        resources: &[EmbeddedResource],
        w: &mut impl FmtWrite,
    ) -> std::fmt::Result {
        CppHeaderWriter::new(w, &self.config).write_document(resources)
    }
}

/// Lines of the `to_array` compatibility shim, relative to the namespace indent
const TO_ARRAY_SHIM: &[&str] = &[
    "template<typename T, std::size_t N>",
    "[[nodiscard]]",
    "constexpr std::array<std::remove_cv_t<T>, N> to_array(T (&arr)[N]) noexcept {",
    "\tstd::array<std::remove_cv_t<T>, N> out{};",
    "\tfor (std::size_t i = 0; i < N; ++i) out[i] = arr[i];",
    "\treturn out;",
    "}",
];

/// [`ResourceWriter`] producing C++ source
struct CppHeaderWriter<'a, W: FmtWrite> {
    writer: &'a mut W,
    config: &'a HeaderConfig,
}

impl<'a, W: FmtWrite> CppHeaderWriter<'a, W> {
    fn new(writer: &'a mut W, config: &'a HeaderConfig) -> Self {
        Self { writer, config }
    }

    fn writeln(&mut self, s: &str) -> std::fmt::Result {
        writeln!(self.writer, "{}{}", self.config.indent_str, s)
    }

    fn declare_view(&mut self, name: &str, escaped: &str) -> std::fmt::Result {
        let line = format!(
            "{} std::string_view {} = std::string_view(\"{}\");",
            self.config.linkage.as_str(),
            name,
            escaped
        );
        self.writeln(&line)
    }

    fn declare_count(&mut self, name: &str, value: usize) -> std::fmt::Result {
        let line = format!("{} int {} = {};", self.config.linkage.as_str(), name, value);
        self.writeln(&line)
    }

    fn declare_blob(&mut self, name: &str, chunk: &LiteralChunk) -> std::fmt::Result {
        let line = format!(
            "{} char {}[{}] = \"{}\";",
            self.config.linkage.as_str(),
            name,
            chunk.len + 1,
            chunk.text
        );
        self.writeln(&line)
    }
}

impl<W: FmtWrite> ResourceWriter for CppHeaderWriter<'_, W> {
    fn write_preamble(&mut self) -> std::fmt::Result {
        writeln!(self.writer, "#ifndef {}", self.config.guard)?;
        writeln!(self.writer, "#define {}", self.config.guard)?;
        writeln!(self.writer)?;

        for include in ["array", "cstddef", "string", "string_view", "type_traits"] {
            writeln!(self.writer, "#include <{}>", include)?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "namespace {}", self.config.namespace)?;
        writeln!(self.writer, "{{")?;
        writeln!(self.writer)?;

        writeln!(self.writer, "#if __cplusplus < 202002L")?;
        for line in TO_ARRAY_SHIM {
            self.writeln(line)?;
        }
        writeln!(self.writer, "#else")?;
        self.writeln("using std::to_array;")?;
        writeln!(self.writer, "#endif")?;
        writeln!(self.writer)
    }

    fn write_resource(&mut self, resource: &EmbeddedResource) -> std::fmt::Result {
        let id = &resource.identifier;
        self.declare_view(&format!("{id}_name"), &escape_text(&resource.display_name))?;

        match (&resource.layout, resource.mode) {
            (ChunkLayout::Single(chunk), EmbedMode::Text) => self.declare_view(id, &chunk.text),
            (ChunkLayout::Single(chunk), EmbedMode::Binary) => {
                self.declare_count(&format!("{id}_size"), chunk.len)?;
                self.declare_blob(id, chunk)
            }
            (ChunkLayout::Chunked(chunks), EmbedMode::Text) => {
                self.declare_count(&format!("{id}__chunks"), chunks.len())?;
                for (i, chunk) in chunks.iter().enumerate() {
                    self.declare_view(&format!("{id}__chunk_{i}"), &chunk.text)?;
                }
                Ok(())
            }
            (ChunkLayout::Chunked(chunks), EmbedMode::Binary) => {
                self.declare_count(&format!("{id}__blob_chunks"), chunks.len())?;
                for (i, chunk) in chunks.iter().enumerate() {
                    self.declare_count(&format!("{id}_size_{i}"), chunk.len)?;
                    self.declare_blob(&format!("{id}__blob_chunk_{i}"), chunk)?;
                }
                Ok(())
            }
        }
    }

    fn write_postamble(&mut self) -> std::fmt::Result {
        writeln!(self.writer)?;
        writeln!(self.writer, "}}")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "#endif")
    }
}
