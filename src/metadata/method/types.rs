use bitflags::bitflags;

/// Mask for the member access bits of `MethodAttributes`
pub const METHOD_ACCESS_MASK: u32 = 0x0007;

bitflags! {
    #[derive(PartialEq, Debug, Clone, Copy)]
    /// Member access of a method. The values form an enumeration, not a set; compare with `==`
    pub struct MethodAccessFlags: u32 {
        /// Member not referenceable
        const COMPILER_CONTROLLED = 0x0000;
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessible by anyone in the assembly
        const ASSEM = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessible by sub-types anywhere, plus anyone in the assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessible by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
    }
}

impl MethodAccessFlags {
    /// Extract the access bits from raw `MethodAttributes`
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & METHOD_ACCESS_MASK)
    }
}

bitflags! {
    #[derive(PartialEq, Debug, Clone, Copy)]
    /// Method modifiers of `MethodAttributes`
    pub struct MethodModifiers: u32 {
        /// Defined on type, not per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name and signature
        const HIDE_BY_SIG = 0x0080;
        /// Method can only be overridden if also accessible
        const STRICT = 0x0200;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// Runtime should check the name encoding
        const RTSPECIAL_NAME = 0x1000;
        /// Method is implemented through `PInvoke`
        const PINVOKE_IMPL = 0x2000;
        /// Method has security associated with it
        const HAS_SECURITY = 0x4000;
    }
}

impl MethodModifiers {
    /// Extract the modifier bits from raw `MethodAttributes`
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & !METHOD_ACCESS_MASK)
    }
}

bitflags! {
    #[derive(PartialEq, Debug, Clone, Copy)]
    /// Flags of a method body header (II.25.4.4)
    pub struct MethodBodyFlags: u16 {
        /// Tiny header, one byte
        const TINY_FORMAT = 0x2;
        /// Fat header, twelve bytes
        const FAT_FORMAT = 0x3;
        /// Extra data sections follow the code
        const MORE_SECTS = 0x8;
        /// Locals are zero initialized
        const INIT_LOCALS = 0x10;
    }
}
