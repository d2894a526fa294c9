//! Emits minimal .NET PE images from a declarative description
//!
//! The image is a PE32 DLL with a single `.text` section holding the CLI header, the method
//! bodies and the metadata (`#~`, `#Strings`, `#US`, `#GUID`, `#Blob`). Every class derives from
//! `[mscorlib]System.Object`. Signatures are passed as raw `ELEMENT_TYPE` bytes.
//!
//! This file only depends on `std`, so the integration tests include it as well.
//!
//! ```ignore
//! let image = ModuleBuilder::new("Sample.dll")
//!     .class("Demo", "Lista", |t| {
//!         t.method("Add", |m| m.param(&[0x08]).local(&[0x02]))
//!             .nested("Año", |n| n)
//!     })
//!     .build();
//! ```

use std::collections::{BTreeMap, HashMap};

const IMAGE_BASE: u32 = 0x0040_0000;
const SECTION_RVA: u32 = 0x2000;
const SECTION_ALIGNMENT: u32 = 0x2000;
const FILE_ALIGNMENT: u32 = 0x200;
const CLI_HEADER_SIZE: u32 = 72;

const METHOD_ACCESS_MASK: u16 = 0x0007;
const METHOD_PRIVATE: u16 = 0x0001;
const METHOD_PUBLIC: u16 = 0x0006;
const METHOD_STATIC: u16 = 0x0010;
const METHOD_VIRTUAL: u16 = 0x0040;
const METHOD_HIDE_BY_SIG: u16 = 0x0080;
const METHOD_ABSTRACT: u16 = 0x0400;
const METHOD_SPECIAL_NAME: u16 = 0x0800;
const METHOD_RT_SPECIAL_NAME: u16 = 0x1000;

const TYPE_PUBLIC_CLASS: u32 = 0x0010_0001;
const TYPE_PUBLIC_INTERFACE: u32 = 0x0000_00A1;
const TYPE_NESTED_PUBLIC: u32 = 0x0010_0002;
const TYPE_NESTED_PRIVATE: u32 = 0x0010_0003;

const SIG_HAS_THIS: u8 = 0x20;
const SIG_LOCALS: u8 = 0x07;
const ELEMENT_VOID: u8 = 0x01;
const ELEMENT_I4: u8 = 0x08;
const ELEMENT_BYREF: u8 = 0x10;
const ELEMENT_CLASS: u8 = 0x12;
const ELEMENT_GENERICINST: u8 = 0x15;
const ELEMENT_PINNED: u8 = 0x45;

/// A method of a [`TypeBuilder`]; public, instance, `void` and with a body unless changed
pub struct MethodBuilder {
    name: String,
    flags: u16,
    params: Vec<Vec<u8>>,
    locals: Vec<Vec<u8>>,
    has_body: bool,
}

impl MethodBuilder {
    fn new(name: &str) -> Self {
        MethodBuilder {
            name: name.to_string(),
            flags: METHOD_PUBLIC | METHOD_HIDE_BY_SIG,
            params: Vec::new(),
            locals: Vec::new(),
            has_body: true,
        }
    }

    /// Make the method `private`
    pub fn private(mut self) -> Self {
        self.flags = (self.flags & !METHOD_ACCESS_MASK) | METHOD_PRIVATE;
        self
    }

    /// Make the method `static`
    pub fn set_static(mut self) -> Self {
        self.flags |= METHOD_STATIC;
        self
    }

    /// Mark the method as a constructor; name it `.ctor` or `.cctor`
    pub fn constructor(mut self) -> Self {
        self.flags |= METHOD_SPECIAL_NAME | METHOD_RT_SPECIAL_NAME;
        self
    }

    /// Append a parameter of the given type
    pub fn param(mut self, signature: &[u8]) -> Self {
        self.params.push(signature.to_vec());
        self
    }

    /// Append a local variable of the given type
    pub fn local(mut self, signature: &[u8]) -> Self {
        self.locals.push(signature.to_vec());
        self
    }

    /// Append a local variable holding a managed reference to the given type
    pub fn byref_local(mut self, signature: &[u8]) -> Self {
        let mut local = vec![ELEMENT_BYREF];
        local.extend_from_slice(signature);
        self.locals.push(local);
        self
    }

    /// Append a pinned local variable of the given type
    pub fn pinned_local(mut self, signature: &[u8]) -> Self {
        let mut local = vec![ELEMENT_PINNED];
        local.extend_from_slice(signature);
        self.locals.push(local);
        self
    }

    /// Emit the method as `abstract virtual`, without a body
    pub fn no_body(mut self) -> Self {
        self.flags |= METHOD_ABSTRACT | METHOD_VIRTUAL;
        self.has_body = false;
        self
    }

    fn signature(&self) -> Vec<u8> {
        let mut signature = vec![if self.flags & METHOD_STATIC == 0 {
            SIG_HAS_THIS
        } else {
            0x00
        }];
        compress(self.params.len() as u32, &mut signature);
        signature.push(ELEMENT_VOID);
        for param in &self.params {
            signature.extend_from_slice(param);
        }
        signature
    }

    fn local_signature(&self) -> Option<Vec<u8>> {
        if self.locals.is_empty() {
            return None;
        }

        let mut signature = vec![SIG_LOCALS];
        compress(self.locals.len() as u32, &mut signature);
        for local in &self.locals {
            signature.extend_from_slice(local);
        }
        Some(signature)
    }
}

enum TypeTarget {
    External { namespace: String, name: String },
    Generic { namespace: String, name: String },
    Local { namespace: String, name: String },
}

/// A type of a [`ModuleBuilder`]
pub struct TypeBuilder {
    namespace: String,
    name: String,
    flags: u32,
    extends: Option<TypeTarget>,
    interfaces: Vec<TypeTarget>,
    methods: Vec<MethodBuilder>,
    nested: Vec<TypeBuilder>,
}

impl TypeBuilder {
    fn new(namespace: &str, name: &str, flags: u32) -> Self {
        TypeBuilder {
            namespace: namespace.to_string(),
            name: name.to_string(),
            flags,
            extends: Some(TypeTarget::External {
                namespace: "System".to_string(),
                name: "Object".to_string(),
            }),
            interfaces: Vec::new(),
            methods: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Add a method
    pub fn method(mut self, name: &str, f: impl FnOnce(MethodBuilder) -> MethodBuilder) -> Self {
        self.methods.push(f(MethodBuilder::new(name)));
        self
    }

    /// Add a `nested public` class
    pub fn nested(self, name: &str, f: impl FnOnce(TypeBuilder) -> TypeBuilder) -> Self {
        self.nested_with(name, TYPE_NESTED_PUBLIC, f)
    }

    /// Add a `nested private` class
    pub fn nested_private(self, name: &str, f: impl FnOnce(TypeBuilder) -> TypeBuilder) -> Self {
        self.nested_with(name, TYPE_NESTED_PRIVATE, f)
    }

    fn nested_with(
        mut self,
        name: &str,
        flags: u32,
        f: impl FnOnce(TypeBuilder) -> TypeBuilder,
    ) -> Self {
        self.nested.push(f(TypeBuilder::new("", name, flags)));
        self
    }

    /// Derive from a class of `mscorlib`
    pub fn extends_external(mut self, namespace: &str, name: &str) -> Self {
        self.extends = Some(TypeTarget::External {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Derive from `name<int>`, a generic class of `mscorlib`
    pub fn extends_generic(mut self, namespace: &str, name: &str) -> Self {
        self.extends = Some(TypeTarget::Generic {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Derive from a top-level type of the same module
    pub fn extends_local(mut self, namespace: &str, name: &str) -> Self {
        self.extends = Some(TypeTarget::Local {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Implement an interface of `mscorlib`
    pub fn implements_external(mut self, namespace: &str, name: &str) -> Self {
        self.interfaces.push(TypeTarget::External {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Implement `name<int>`, a generic interface of `mscorlib`
    pub fn implements_generic(mut self, namespace: &str, name: &str) -> Self {
        self.interfaces.push(TypeTarget::Generic {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Implement a top-level interface of the same module
    pub fn implements_local(mut self, namespace: &str, name: &str) -> Self {
        self.interfaces.push(TypeTarget::Local {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        self
    }
}

/// Builds a complete .NET module image
pub struct ModuleBuilder {
    name: String,
    types: Vec<TypeBuilder>,
    cli_header: bool,
}

impl ModuleBuilder {
    /// Start a module named `name`, e.g. `Sample.dll`
    pub fn new(name: &str) -> Self {
        ModuleBuilder {
            name: name.to_string(),
            types: Vec::new(),
            cli_header: true,
        }
    }

    /// Add a public class deriving from `System.Object`
    pub fn class(
        mut self,
        namespace: &str,
        name: &str,
        f: impl FnOnce(TypeBuilder) -> TypeBuilder,
    ) -> Self {
        self.types
            .push(f(TypeBuilder::new(namespace, name, TYPE_PUBLIC_CLASS)));
        self
    }

    /// Add a public interface
    pub fn interface(
        mut self,
        namespace: &str,
        name: &str,
        f: impl FnOnce(TypeBuilder) -> TypeBuilder,
    ) -> Self {
        let mut interface = TypeBuilder::new(namespace, name, TYPE_PUBLIC_INTERFACE);
        interface.extends = None;
        self.types.push(f(interface));
        self
    }

    /// Leave the CLI header directory empty, producing a native image
    pub fn without_cli_header(mut self) -> Self {
        self.cli_header = false;
        self
    }

    /// Emit the PE image
    pub fn build(self) -> Vec<u8> {
        let mut section = vec![0_u8; CLI_HEADER_SIZE as usize];
        let metadata = MetadataWriter::new(&self).write(&mut section);

        align(&mut section, 4);
        let metadata_rva = SECTION_RVA + section.len() as u32;
        let metadata_size = metadata.len() as u32;
        section.extend_from_slice(&metadata);

        let mut cli_header = Vec::with_capacity(CLI_HEADER_SIZE as usize);
        put_u32(&mut cli_header, CLI_HEADER_SIZE);
        put_u16(&mut cli_header, 2);
        put_u16(&mut cli_header, 5);
        put_u32(&mut cli_header, metadata_rva);
        put_u32(&mut cli_header, metadata_size);
        put_u32(&mut cli_header, 0x0000_0001); // ILONLY
        cli_header.resize(CLI_HEADER_SIZE as usize, 0);
        section[..CLI_HEADER_SIZE as usize].copy_from_slice(&cli_header);

        write_pe(&section, self.cli_header)
    }
}

struct Heaps {
    strings: Vec<u8>,
    string_index: HashMap<String, u32>,
    blobs: Vec<u8>,
    blob_index: HashMap<Vec<u8>, u32>,
}

impl Heaps {
    fn new() -> Self {
        Heaps {
            strings: vec![0],
            string_index: HashMap::new(),
            blobs: vec![0],
            blob_index: HashMap::new(),
        }
    }

    fn string(&mut self, value: &str) -> u32 {
        if value.is_empty() {
            return 0;
        }

        if let Some(index) = self.string_index.get(value) {
            return *index;
        }

        let index = self.strings.len() as u32;
        self.strings.extend_from_slice(value.as_bytes());
        self.strings.push(0);
        self.string_index.insert(value.to_string(), index);
        index
    }

    fn blob(&mut self, value: &[u8]) -> u32 {
        if let Some(index) = self.blob_index.get(value) {
            return *index;
        }

        let index = self.blobs.len() as u32;
        compress(value.len() as u32, &mut self.blobs);
        self.blobs.extend_from_slice(value);
        self.blob_index.insert(value.to_vec(), index);
        index
    }
}

/// One column of a table row; heap, table and coded indexes get their width when the tables
/// stream is written
#[derive(Clone, Copy)]
enum Cell {
    U16(u16),
    U32(u32),
    Str(u32),
    Guid(u32),
    Blob(u32),
    /// Index into the table with the given id
    Table(u8, u32),
    TypeDefOrRef(u32),
    ResolutionScope(u32),
}

const TABLE_MODULE: u8 = 0x00;
const TABLE_TYPEREF: u8 = 0x01;
const TABLE_TYPEDEF: u8 = 0x02;
const TABLE_FIELD: u8 = 0x04;
const TABLE_METHODDEF: u8 = 0x06;
const TABLE_PARAM: u8 = 0x08;
const TABLE_INTERFACEIMPL: u8 = 0x09;
const TABLE_STANDALONESIG: u8 = 0x11;
const TABLE_MODULEREF: u8 = 0x1A;
const TABLE_TYPESPEC: u8 = 0x1B;
const TABLE_ASSEMBLY: u8 = 0x20;
const TABLE_ASSEMBLYREF: u8 = 0x23;
const TABLE_NESTEDCLASS: u8 = 0x29;

/// Index widths of one image, as ECMA-335 II.24.2.6 derives them from heap sizes and row counts
struct Widths {
    large_strings: bool,
    large_guids: bool,
    large_blobs: bool,
    rows: [u32; 64],
}

impl Widths {
    fn heap_sizes(&self) -> u8 {
        u8::from(self.large_strings)
            | u8::from(self.large_guids) << 1
            | u8::from(self.large_blobs) << 2
    }

    /// Coded indexes with two tag bits are 4 bytes wide once any table reaches 2^14 rows
    fn large_coded(&self, tables: &[u8]) -> bool {
        tables
            .iter()
            .any(|table| self.rows[*table as usize] >= 1 << 14)
    }

    fn put(&self, out: &mut Vec<u8>, cell: Cell) {
        let (value, large) = match cell {
            Cell::U16(value) => return put_u16(out, value),
            Cell::U32(value) => return put_u32(out, value),
            Cell::Str(index) => (index, self.large_strings),
            Cell::Guid(index) => (index, self.large_guids),
            Cell::Blob(index) => (index, self.large_blobs),
            Cell::Table(table, rid) => (rid, self.rows[table as usize] > 0xFFFF),
            Cell::TypeDefOrRef(value) => (
                value,
                self.large_coded(&[TABLE_TYPEDEF, TABLE_TYPEREF, TABLE_TYPESPEC]),
            ),
            Cell::ResolutionScope(value) => (
                value,
                self.large_coded(&[
                    TABLE_MODULE,
                    TABLE_MODULEREF,
                    TABLE_ASSEMBLYREF,
                    TABLE_TYPEREF,
                ]),
            ),
        };

        if large {
            put_u32(out, value);
        } else {
            put_u16(out, value as u16);
        }
    }
}

/// Rows of the tables the images carry, by table id
#[derive(Default)]
struct Rows {
    tables: BTreeMap<u8, Vec<Vec<Cell>>>,
    typeref_index: HashMap<(String, String), u32>,
}

impl Rows {
    /// Append a row and return its rid
    fn push(&mut self, table: u8, row: Vec<Cell>) -> u32 {
        let rows = self.tables.entry(table).or_default();
        rows.push(row);
        rows.len() as u32
    }

    fn count(&self, table: u8) -> u32 {
        self.tables.get(&table).map_or(0, |rows| rows.len() as u32)
    }
}

struct MetadataWriter<'a> {
    module: &'a ModuleBuilder,
    /// Types in `TypeDef` order with the rid of their enclosing type; rid = index + 2
    types: Vec<(&'a TypeBuilder, Option<u32>)>,
    heaps: Heaps,
    rows: Rows,
}

impl<'a> MetadataWriter<'a> {
    fn new(module: &'a ModuleBuilder) -> Self {
        fn flatten<'t>(
            cil_type: &'t TypeBuilder,
            enclosing: Option<u32>,
            types: &mut Vec<(&'t TypeBuilder, Option<u32>)>,
        ) {
            let rid = types.len() as u32 + 2;
            types.push((cil_type, enclosing));
            for nested in &cil_type.nested {
                flatten(nested, Some(rid), types);
            }
        }

        let mut types = Vec::new();
        for cil_type in &module.types {
            flatten(cil_type, None, &mut types);
        }

        MetadataWriter {
            module,
            types,
            heaps: Heaps::new(),
            rows: Rows::default(),
        }
    }

    /// Append the method bodies to `section` and return the metadata blob
    fn write(mut self, section: &mut Vec<u8>) -> Vec<u8> {
        // System.Object is always TypeRef 1
        self.type_ref("System", "Object");

        self.typedef_row(0, "", "<Module>", 0, 1);

        let types = std::mem::take(&mut self.types);
        for (rid, (cil_type, enclosing)) in (2_u32..).zip(&types) {
            let extends = match &cil_type.extends {
                Some(target) => self.type_def_or_ref(target, &types),
                None => 0,
            };

            let method_list = self.rows.count(TABLE_METHODDEF) + 1;
            self.typedef_row(
                cil_type.flags,
                &cil_type.namespace,
                &cil_type.name,
                extends,
                method_list,
            );

            for method in &cil_type.methods {
                self.method_row(method, section);
            }

            for interface in &cil_type.interfaces {
                let coded = self.type_def_or_ref(interface, &types);
                self.rows.push(
                    TABLE_INTERFACEIMPL,
                    vec![Cell::Table(TABLE_TYPEDEF, rid), Cell::TypeDefOrRef(coded)],
                );
            }

            if let Some(enclosing) = enclosing {
                self.rows.push(
                    TABLE_NESTEDCLASS,
                    vec![Cell::Table(TABLE_TYPEDEF, rid), Cell::Table(TABLE_TYPEDEF, *enclosing)],
                );
            }
        }

        let tables = self.tables_stream();

        let mut guids = vec![
            0x3F, 0x2A, 0x91, 0x5C, 0x0B, 0x7E, 0x4D, 0x41, 0x9A, 0x63, 0x1E, 0x05, 0xC8, 0x77,
            0xD2, 0x10,
        ];
        let mut strings = self.heaps.strings;
        let mut blobs = self.heaps.blobs;
        let mut userstrings = vec![0];

        for heap in [&mut strings, &mut blobs, &mut userstrings, &mut guids] {
            align(heap, 4);
        }

        write_root(&[
            ("#~", tables),
            ("#Strings", strings),
            ("#US", userstrings),
            ("#GUID", guids),
            ("#Blob", blobs),
        ])
    }

    fn type_ref(&mut self, namespace: &str, name: &str) -> u32 {
        let key = (namespace.to_string(), name.to_string());
        if let Some(rid) = self.rows.typeref_index.get(&key) {
            return *rid;
        }

        let name_index = self.heaps.string(name);
        let namespace_index = self.heaps.string(namespace);

        // ResolutionScope: AssemblyRef 1
        let rid = self.rows.push(
            TABLE_TYPEREF,
            vec![
                Cell::ResolutionScope((1 << 2) | 2),
                Cell::Str(name_index),
                Cell::Str(namespace_index),
            ],
        );
        self.rows.typeref_index.insert(key, rid);
        rid
    }

    /// Encode `target` as a `TypeDefOrRef` coded index
    fn type_def_or_ref(&mut self, target: &TypeTarget, types: &[(&TypeBuilder, Option<u32>)]) -> u32 {
        match target {
            TypeTarget::External { namespace, name } => {
                let rid = self.type_ref(namespace, name);
                (rid << 2) | 1
            }
            TypeTarget::Generic { namespace, name } => {
                let rid = self.type_ref(namespace, name);
                let mut signature = vec![ELEMENT_GENERICINST, ELEMENT_CLASS];
                compress((rid << 2) | 1, &mut signature);
                signature.extend_from_slice(&[1, ELEMENT_I4]);

                let blob = self.heaps.blob(&signature);
                let rid = self.rows.push(TABLE_TYPESPEC, vec![Cell::Blob(blob)]);
                (rid << 2) | 2
            }
            TypeTarget::Local { namespace, name } => {
                let index = types
                    .iter()
                    .position(|(cil_type, _)| cil_type.namespace == *namespace && cil_type.name == *name)
                    .unwrap_or_else(|| panic!("no type {namespace}.{name} in the module"));
                (index as u32 + 2) << 2
            }
        }
    }

    fn typedef_row(&mut self, flags: u32, namespace: &str, name: &str, extends: u32, method_list: u32) {
        let name_index = self.heaps.string(name);
        let namespace_index = self.heaps.string(namespace);

        self.rows.push(
            TABLE_TYPEDEF,
            vec![
                Cell::U32(flags),
                Cell::Str(name_index),
                Cell::Str(namespace_index),
                Cell::TypeDefOrRef(extends),
                Cell::Table(TABLE_FIELD, 1),
                Cell::Table(TABLE_METHODDEF, method_list),
            ],
        );
    }

    fn method_row(&mut self, method: &MethodBuilder, section: &mut Vec<u8>) {
        let rva = if method.has_body {
            align(section, 4);
            let rva = SECTION_RVA + section.len() as u32;

            match method.local_signature() {
                Some(locals) => {
                    let blob = self.heaps.blob(&locals);
                    let sig = self.rows.push(TABLE_STANDALONESIG, vec![Cell::Blob(blob)]);

                    // fat header: 3 dwords, init locals, max stack 8, one byte of code
                    section.extend_from_slice(&[0x13, 0x30, 0x08, 0x00]);
                    put_u32(section, 1);
                    put_u32(section, 0x1100_0000 | sig);
                }
                None => section.push(0x06),
            }

            section.push(0x2A); // ret
            rva
        } else {
            0
        };

        let name_index = self.heaps.string(&method.name);
        let signature_index = self.heaps.blob(&method.signature());

        self.rows.push(
            TABLE_METHODDEF,
            vec![
                Cell::U32(rva),
                Cell::U16(0),
                Cell::U16(method.flags),
                Cell::Str(name_index),
                Cell::Blob(signature_index),
                Cell::Table(TABLE_PARAM, 1),
            ],
        );
    }

    fn tables_stream(&mut self) -> Vec<u8> {
        let module_name = self.heaps.string(&self.module.name);
        let assembly_name = match self.module.name.rsplit_once('.') {
            Some((stem, _)) => stem.to_string(),
            None => self.module.name.clone(),
        };
        let assembly_name = self.heaps.string(&assembly_name);
        let mscorlib = self.heaps.string("mscorlib");
        let token = self
            .heaps
            .blob(&[0xB7, 0x7A, 0x5C, 0x56, 0x19, 0x34, 0xE0, 0x89]);

        self.rows.push(
            TABLE_MODULE,
            vec![Cell::U16(0), Cell::Str(module_name), Cell::Guid(1), Cell::Guid(0), Cell::Guid(0)],
        );

        let mut assembly = vec![Cell::U32(0x8004)];
        assembly.extend([1, 0, 0, 0].map(Cell::U16));
        assembly.extend([Cell::U32(0), Cell::Blob(0), Cell::Str(assembly_name), Cell::Str(0)]);
        self.rows.push(TABLE_ASSEMBLY, assembly);

        let mut assembly_ref: Vec<Cell> = [4, 0, 0, 0].map(Cell::U16).to_vec();
        assembly_ref.extend([
            Cell::U32(0),
            Cell::Blob(token),
            Cell::Str(mscorlib),
            Cell::Str(0),
            Cell::Blob(0),
        ]);
        self.rows.push(TABLE_ASSEMBLYREF, assembly_ref);

        let mut widths = Widths {
            large_strings: self.heaps.strings.len() > 0xFFFF,
            large_guids: false,
            large_blobs: self.heaps.blobs.len() > 0xFFFF,
            rows: [0; 64],
        };
        let mut valid = 0_u64;
        for (id, rows) in &self.rows.tables {
            widths.rows[*id as usize] = rows.len() as u32;
            valid |= 1_u64 << *id;
        }

        let mut stream = vec![0x00, 0x00, 0x00, 0x00, 0x02, 0x00, widths.heap_sizes(), 0x01];
        stream.extend_from_slice(&valid.to_le_bytes());
        stream.extend_from_slice(&0_u64.to_le_bytes());
        for rows in self.rows.tables.values() {
            put_u32(&mut stream, rows.len() as u32);
        }
        for rows in self.rows.tables.values() {
            for cell in rows.iter().flatten() {
                widths.put(&mut stream, *cell);
            }
        }

        align(&mut stream, 4);
        stream
    }
}

fn write_root(streams: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut version = b"v4.0.30319".to_vec();
    align(&mut version, 4);

    let headers_size: usize = streams
        .iter()
        .map(|(name, _)| 8 + ((name.len() + 1 + 3) & !3))
        .sum();

    let mut root = Vec::new();
    root.extend_from_slice(b"BSJB");
    put_u16(&mut root, 1);
    put_u16(&mut root, 1);
    put_u32(&mut root, 0);
    put_u32(&mut root, version.len() as u32);
    root.extend_from_slice(&version);
    put_u16(&mut root, 0);
    put_u16(&mut root, streams.len() as u16);

    let mut offset = root.len() + headers_size;
    for (name, data) in streams {
        put_u32(&mut root, offset as u32);
        put_u32(&mut root, data.len() as u32);
        root.extend_from_slice(name.as_bytes());
        root.push(0);
        align(&mut root, 4);
        offset += data.len();
    }

    for (_, data) in streams {
        root.extend_from_slice(data);
    }

    root
}

fn write_pe(section: &[u8], cli_header: bool) -> Vec<u8> {
    let raw_size = align_value(section.len() as u32, FILE_ALIGNMENT);
    let image_size = SECTION_RVA + align_value(section.len() as u32, SECTION_ALIGNMENT);

    let mut image = Vec::with_capacity((FILE_ALIGNMENT + raw_size) as usize);

    // DOS header, e_lfanew at 0x3C
    image.extend_from_slice(b"MZ");
    image.resize(0x3C, 0);
    put_u32(&mut image, 0x80);
    image.resize(0x80, 0);

    // COFF header: i386, one section, 224 byte optional header, DLL
    image.extend_from_slice(b"PE\0\0");
    put_u16(&mut image, 0x014C);
    put_u16(&mut image, 1);
    put_u32(&mut image, 0);
    put_u32(&mut image, 0);
    put_u32(&mut image, 0);
    put_u16(&mut image, 0xE0);
    put_u16(&mut image, 0x2102);

    // PE32 optional header
    put_u16(&mut image, 0x010B);
    image.extend_from_slice(&[0x08, 0x00]);
    put_u32(&mut image, raw_size);
    put_u32(&mut image, 0);
    put_u32(&mut image, 0);
    put_u32(&mut image, 0);
    put_u32(&mut image, SECTION_RVA);
    put_u32(&mut image, 0);
    put_u32(&mut image, IMAGE_BASE);
    put_u32(&mut image, SECTION_ALIGNMENT);
    put_u32(&mut image, FILE_ALIGNMENT);
    for version in [4, 0, 0, 0, 4, 0] {
        put_u16(&mut image, version);
    }
    put_u32(&mut image, 0);
    put_u32(&mut image, image_size);
    put_u32(&mut image, FILE_ALIGNMENT);
    put_u32(&mut image, 0);
    put_u16(&mut image, 3);
    put_u16(&mut image, 0x8540);
    for size in [0x0010_0000, 0x1000, 0x0010_0000, 0x1000] {
        put_u32(&mut image, size);
    }
    put_u32(&mut image, 0);
    put_u32(&mut image, 16);

    for directory in 0..16 {
        if directory == 14 && cli_header {
            put_u32(&mut image, SECTION_RVA);
            put_u32(&mut image, CLI_HEADER_SIZE);
        } else {
            put_u32(&mut image, 0);
            put_u32(&mut image, 0);
        }
    }

    // .text
    image.extend_from_slice(b".text\0\0\0");
    put_u32(&mut image, section.len() as u32);
    put_u32(&mut image, SECTION_RVA);
    put_u32(&mut image, raw_size);
    put_u32(&mut image, FILE_ALIGNMENT);
    put_u32(&mut image, 0);
    put_u32(&mut image, 0);
    put_u16(&mut image, 0);
    put_u16(&mut image, 0);
    put_u32(&mut image, 0x6000_0020);

    image.resize(FILE_ALIGNMENT as usize, 0);
    image.extend_from_slice(section);
    image.resize((FILE_ALIGNMENT + raw_size) as usize, 0);
    image
}

/// ECMA-335 II.23.2 compressed unsigned integer
fn compress(value: u32, out: &mut Vec<u8>) {
    if value < 0x80 {
        out.push(value as u8);
    } else if value < 0x4000 {
        out.extend_from_slice(&((value as u16) | 0x8000).to_be_bytes());
    } else {
        out.extend_from_slice(&(value | 0xC000_0000).to_be_bytes());
    }
}

fn align(data: &mut Vec<u8>, alignment: usize) {
    let aligned = (data.len() + alignment - 1) & !(alignment - 1);
    data.resize(aligned, 0);
}

fn align_value(value: u32, alignment: u32) -> u32 {
    (value + alignment - 1) & !(alignment - 1)
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}
