//! Modifier flags carried by `Modifiers` nodes and blocks

use bitflags::bitflags;

bitflags! {
    /// Declaration modifiers plus the synthetic markers the front end and
    /// code generators attach to declarations
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u32 {
        const PUBLIC       = 1 << 0;
        const PRIVATE      = 1 << 1;
        const PROTECTED    = 1 << 2;
        const STATIC       = 1 << 3;
        const FINAL        = 1 << 4;
        const SYNCHRONIZED = 1 << 5;
        const VOLATILE     = 1 << 6;
        const TRANSIENT    = 1 << 7;
        const NATIVE       = 1 << 8;
        const INTERFACE    = 1 << 9;
        const ABSTRACT     = 1 << 10;
        const STRICTFP     = 1 << 11;
        const DEFAULT      = 1 << 12;
        const SYNTHETIC    = 1 << 13;
        const ANNOTATION   = 1 << 14;
        const ENUM         = 1 << 15;
        const VARARGS      = 1 << 16;
        const GENERATED_CONSTRUCTOR = 1 << 17;
    }
}

/// Flags that print as source keywords, in print order
const KEYWORDS: &[(Flags, &str)] = &[
    (Flags::PUBLIC, "public"),
    (Flags::PRIVATE, "private"),
    (Flags::PROTECTED, "protected"),
    (Flags::STATIC, "static"),
    (Flags::FINAL, "final"),
    (Flags::SYNCHRONIZED, "synchronized"),
    (Flags::VOLATILE, "volatile"),
    (Flags::TRANSIENT, "transient"),
    (Flags::NATIVE, "native"),
    (Flags::ABSTRACT, "abstract"),
    (Flags::STRICTFP, "strictfp"),
    (Flags::DEFAULT, "default"),
];

impl Flags {
    /// Modifiers implicit on interface fields
    pub const INTERFACE_FIELD_IMPLICIT: Flags = Flags::PUBLIC
        .union(Flags::STATIC)
        .union(Flags::FINAL);
    /// Modifiers implicit on interface methods
    pub const INTERFACE_METHOD_IMPLICIT: Flags = Flags::PUBLIC.union(Flags::ABSTRACT);
    /// Modifiers implicit on types nested in an interface
    pub const INTERFACE_TYPE_IMPLICIT: Flags = Flags::PUBLIC.union(Flags::STATIC);

    /// Keyword for a modifier token as it appears in source
    pub fn from_keyword(keyword: &str) -> Option<Flags> {
        KEYWORDS
            .iter()
            .find(|(_, name)| *name == keyword)
            .map(|(flag, _)| *flag)
    }

    /// Source keywords of the set flags, in canonical order
    pub fn keywords(self) -> Vec<&'static str> {
        KEYWORDS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}
