use crate::metadata::token::Token;

/// A type as it appears inside a signature blob (ECMA-335 II.23.2.12)
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TypeSignature {
    /// Not yet parsed
    #[default]
    Unknown,
    /// `void`
    Void,
    /// `bool`
    Boolean,
    /// `char`
    Char,
    /// `sbyte`
    I1,
    /// `byte`
    U1,
    /// `short`
    I2,
    /// `ushort`
    U2,
    /// `int`
    I4,
    /// `uint`
    U4,
    /// `long`
    I8,
    /// `ulong`
    U8,
    /// `float`
    R4,
    /// `double`
    R8,
    /// `string`
    String,
    /// Unmanaged pointer
    Ptr(SignaturePointer),
    /// Managed reference
    ByRef(Box<TypeSignature>),
    /// A value type, by `TypeDef`, `TypeRef` or `TypeSpec` token
    ValueType(Token),
    /// A reference type, by `TypeDef`, `TypeRef` or `TypeSpec` token
    Class(Token),
    /// Generic parameter of the enclosing type, by index
    GenericParamType(u32),
    /// Multi-dimensional array
    Array(SignatureArray),
    /// Generic instantiation; the base is a `Class` or `ValueType`
    GenericInst(Box<TypeSignature>, Vec<TypeSignature>),
    /// `System.TypedReference`
    TypedByRef,
    /// `nint`
    I,
    /// `nuint`
    U,
    /// Function pointer
    FnPtr(Box<SignatureMethod>),
    /// `object`
    Object,
    /// Single-dimensional, zero-based array
    SzArray(SignatureSzArray),
    /// Generic parameter of the enclosing method, by index
    GenericParamMethod(u32),
    /// A required custom modifier run
    ModifiedRequired(Vec<Token>),
    /// An optional custom modifier run
    ModifiedOptional(Vec<Token>),
    /// Runtime internal type
    Internal,
    /// Vararg sentinel
    Sentinel,
    /// Pinned local
    Pinned(Box<TypeSignature>),
}

/// `ARRAY` element type with shape
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureArray {
    /// Element type
    pub base: Box<TypeSignature>,
    /// Number of dimensions
    pub rank: u32,
    /// Declared sizes of the leading dimensions
    pub sizes: Vec<u32>,
    /// Declared lower bounds of the leading dimensions
    pub lower_bounds: Vec<u32>,
}

/// `SZARRAY` element type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureSzArray {
    /// Custom modifiers of the element
    pub modifiers: Vec<Token>,
    /// Element type
    pub base: Box<TypeSignature>,
}

/// `PTR` element type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignaturePointer {
    /// Custom modifiers of the pointee
    pub modifiers: Vec<Token>,
    /// Pointee type
    pub base: Box<TypeSignature>,
}

/// A parameter or return type of a method signature
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureParameter {
    /// Custom modifiers
    pub modifiers: Vec<Token>,
    /// Passed by reference
    pub by_ref: bool,
    /// The parameter type
    pub base: TypeSignature,
}

/// A `MethodDefSig` (II.23.2.1)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureMethod {
    /// Instance method, `this` is passed implicitly
    pub has_this: bool,
    /// `this` is spelled out as the first parameter
    pub explicit_this: bool,
    /// Uses the vararg calling convention
    pub vararg: bool,
    /// Number of generic parameters, 0 for non-generic methods
    pub param_count_generic: u32,
    /// Number of declared parameters, not counting `this`
    pub param_count: u32,
    /// Return type
    pub return_type: SignatureParameter,
    /// Declared parameters
    pub params: Vec<SignatureParameter>,
    /// Parameters following the vararg sentinel
    pub varargs: Vec<SignatureParameter>,
}

/// A `LocalVarSig` (II.23.2.6)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureLocalVariables {
    /// The locals, in slot order
    pub locals: Vec<SignatureLocalVariable>,
}

/// One local variable slot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureLocalVariable {
    /// Custom modifiers
    pub modifiers: Vec<Token>,
    /// Slot holds a managed reference
    pub is_byref: bool,
    /// Slot pins its referent
    pub is_pinned: bool,
    /// Slot type
    pub base: TypeSignature,
}

/// A `TypeSpec` blob (II.23.2.14)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureTypeSpec {
    /// The described type
    pub base: TypeSignature,
}
