//! A loaded .NET module
//!
//! [`CilModule`] reads the PE image, the CLI header and the metadata streams once, and turns the
//! `TypeDef`, `MethodDef`, `InterfaceImpl` and `NestedClass` tables into an owned type model.
//! Nothing borrows the image after loading; the file is released when `load` returns.

use std::path::Path;

use crate::{
    file::File,
    metadata::{
        cor20header::Cor20Header,
        method::{Method, MethodAccessFlags, MethodBody, MethodModifiers},
        root::Root,
        signatures::{
            parse_local_var_signature, parse_method_signature, parse_type_spec_signature,
            SignatureLocalVariable, TypeSignature,
        },
        streams::{Blob, Guid, Strings, TablesHeader},
        tables::{
            CodedIndex, InterfaceImplRaw, MethodDefRaw, ModuleRaw, NestedClassRaw,
            StandAloneSigRaw, TableId, TypeDefRaw, TypeRefRaw, TypeSpecRaw,
        },
        token::Token,
        typesystem::{CilType, TypeReference, TypeRegistry},
    },
    Error::{OutOfBounds, RecursionLimit, TokenNotFound},
    Result,
};

/// Deepest chain of nested `TypeRef`s that is followed when naming an external type
const MAX_TYPEREF_NESTING: usize = 32;

/// The metadata streams a module is built from
struct Streams<'a> {
    tables: TablesHeader<'a>,
    strings: Strings<'a>,
    blobs: Blob<'a>,
    guids: Option<Guid<'a>>,
}

impl<'a> Streams<'a> {
    fn from_root(metadata: &'a [u8], root: &Root) -> Result<Streams<'a>> {
        let mut tables = None;
        let mut strings = None;
        let mut blobs = None;
        let mut guids = None;

        for stream in &root.stream_headers {
            let start = stream.offset as usize;
            let end = start + stream.size as usize;
            if end > metadata.len() {
                return Err(OutOfBounds);
            }

            let stream_data = &metadata[start..end];
            match stream.name.as_str() {
                "#~" | "#-" => tables = Some(TablesHeader::from(stream_data)?),
                "#Strings" => strings = Some(Strings::from(stream_data)?),
                "#Blob" => blobs = Some(Blob::from(stream_data)?),
                "#GUID" => guids = Some(Guid::from(stream_data)?),
                "#US" => {}
                other => log::warn!("Skipping unknown metadata stream '{}'", other),
            }
        }

        let Some(tables) = tables else {
            return Err(malformed_error!("Metadata has no tables stream"));
        };
        let Some(strings) = strings else {
            return Err(malformed_error!("Metadata has no #Strings heap"));
        };
        let Some(blobs) = blobs else {
            return Err(malformed_error!("Metadata has no #Blob heap"));
        };

        Ok(Streams {
            tables,
            strings,
            blobs,
            guids,
        })
    }
}

/// A .NET module, loaded from a PE image into an owned type model
///
/// ```rust,no_run
/// use dotinspect::CilModule;
/// use std::path::Path;
///
/// let module = CilModule::from_file(Path::new("tests/samples/Sample.dll"))?;
/// for cil_type in module.types() {
///     println!("{} - {} methods", cil_type.fullname(), cil_type.methods.len());
/// }
/// # Ok::<(), dotinspect::Error>(())
/// ```
pub struct CilModule {
    name: String,
    mvid: uguid::Guid,
    version: String,
    types: TypeRegistry,
}

impl CilModule {
    /// Load the module at `file`
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a .NET PE image, or its metadata is
    /// malformed
    pub fn from_file(file: &Path) -> Result<CilModule> {
        let input = File::from_file(file)?;
        Self::load(&input)
    }

    /// Load a module from an in-memory image
    ///
    /// # Errors
    /// Returns an error if `data` is not a .NET PE image, or its metadata is malformed
    pub fn from_mem(data: Vec<u8>) -> Result<CilModule> {
        let input = File::from_mem(data)?;
        Self::load(&input)
    }

    fn load(file: &File) -> Result<CilModule> {
        let (clr_rva, clr_size) = file.clr()?;
        let clr_offset = file.rva_to_offset(clr_rva)?;
        let cor20header = Cor20Header::read(file.data_slice(clr_offset, clr_size)?)?;

        let metadata_offset = file.rva_to_offset(cor20header.meta_data_rva as usize)?;
        let metadata = file.data_slice(metadata_offset, cor20header.meta_data_size as usize)?;
        let root = Root::read(metadata)?;
        let streams = Streams::from_root(metadata, &root)?;

        let Some(module_row) = streams
            .tables
            .table::<ModuleRaw>()
            .and_then(|modules| modules.get(1))
        else {
            return Err(malformed_error!("Module table is missing"));
        };

        let name = streams.strings.get(module_row.name as usize)?.to_string();
        let mvid = match &streams.guids {
            Some(guids) if module_row.mvid != 0 => guids.get(module_row.mvid as usize)?,
            _ => uguid::Guid::ZERO,
        };

        log::debug!(
            "Loading module '{}' ({}), metadata version {}, {} tables",
            name,
            mvid,
            root.version,
            streams.tables.table_count()
        );

        let loader = ModuleLoader {
            file,
            streams: &streams,
        };
        let types = loader.load_types()?;

        log::debug!(
            "Module '{}' defines {} types with {} methods",
            name,
            types.len(),
            types.iter().map(|t| t.methods.len()).sum::<usize>()
        );

        Ok(CilModule {
            name,
            mvid,
            version: root.version,
            types,
        })
    }

    /// The module name, e.g. `Sample.dll`
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The module version id
    #[must_use]
    pub fn mvid(&self) -> &uguid::Guid {
        &self.mvid
    }

    /// The runtime version the module was built against, e.g. `v4.0.30319`
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// All types of the module in `TypeDef` order, `<Module>` excluded
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Look up a type by its `TypeDef` token
    #[must_use]
    pub fn type_by_token(&self, token: &Token) -> Option<&CilType> {
        self.types.get(token)
    }
}

/// Builds the type model from the tables of one module
struct ModuleLoader<'a, 'b> {
    file: &'a File,
    streams: &'b Streams<'a>,
}

impl ModuleLoader<'_, '_> {
    fn load_types(&self) -> Result<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        let Some(typedefs) = self.streams.tables.table::<TypeDefRaw>() else {
            return Ok(registry);
        };

        let typedef_rows = typedefs.rows()?;
        let methods = self.load_methods_for(&typedef_rows)?;

        for (typedef, methods) in typedef_rows.iter().zip(methods) {
            // rid 1 is the <Module> pseudo type holding global members
            if typedef.rid == 1 {
                continue;
            }

            let mut cil_type = CilType::new(
                typedef.token,
                self.streams.strings.get(typedef.type_namespace as usize)?,
                self.streams.strings.get(typedef.type_name as usize)?,
                typedef.flags,
            );
            cil_type.base = self.resolve_type(&typedef.extends)?;
            cil_type.methods = methods;
            registry.insert(cil_type);
        }

        self.load_interfaces(&mut registry, typedef_rows.len())?;
        self.load_nesting(&mut registry)?;

        Ok(registry)
    }

    /// Split the `MethodDef` table into the method list of each type
    fn load_methods_for(&self, typedef_rows: &[TypeDefRaw]) -> Result<Vec<Vec<Method>>> {
        let methoddefs = self.streams.tables.table::<MethodDefRaw>();
        let method_count = methoddefs.map_or(0, |table| table.row_count());

        let mut result = Vec::with_capacity(typedef_rows.len());
        for (index, typedef) in typedef_rows.iter().enumerate() {
            let start = typedef.method_list;
            let end = typedef_rows
                .get(index + 1)
                .map_or(method_count + 1, |next| next.method_list);

            if start == 0 || start > end || end > method_count + 1 {
                return Err(malformed_error!(
                    "Invalid method list of type {} - {}..{}",
                    typedef.token,
                    start,
                    end
                ));
            }

            let mut methods = Vec::with_capacity((end - start) as usize);
            if let Some(methoddefs) = methoddefs {
                for rid in start..end {
                    let row = methoddefs.read(rid)?;
                    methods.push(self.load_method(&row, typedef.token)?);
                }
            }

            result.push(methods);
        }

        Ok(result)
    }

    fn load_method(&self, row: &MethodDefRaw, declaring_type: Token) -> Result<Method> {
        let name = self.streams.strings.get(row.name as usize)?.to_string();
        let signature = parse_method_signature(self.streams.blobs.get(row.signature as usize)?)?;

        let (body, local_vars) = if row.rva == 0 {
            (None, Vec::new())
        } else {
            let offset = self.file.rva_to_offset(row.rva as usize)?;
            let Some(remaining) = self.file.len().checked_sub(offset) else {
                return Err(OutOfBounds);
            };

            let body = MethodBody::from(self.file.data_slice(offset, remaining)?)?;
            let local_vars = self.load_locals(body.local_var_sig_token)?;
            (Some(body), local_vars)
        };

        Ok(Method {
            token: row.token,
            name,
            declaring_type,
            flags_access: MethodAccessFlags::from_method_flags(row.flags),
            flags_modifiers: MethodModifiers::from_method_flags(row.flags),
            rva: (row.rva != 0).then_some(row.rva),
            signature,
            body,
            local_vars,
        })
    }

    fn load_locals(&self, local_var_sig_token: u32) -> Result<Vec<SignatureLocalVariable>> {
        if local_var_sig_token == 0 {
            return Ok(Vec::new());
        }

        let token = Token::new(local_var_sig_token);
        if token.table() != TableId::StandAloneSig as u8 {
            return Err(malformed_error!(
                "Local variable signature token points outside StandAloneSig - {}",
                token
            ));
        }

        let Some(row) = self
            .streams
            .tables
            .table::<StandAloneSigRaw>()
            .and_then(|sigs| sigs.get(token.row()))
        else {
            return Err(TokenNotFound(token));
        };

        let locals = parse_local_var_signature(self.streams.blobs.get(row.signature as usize)?)?;
        Ok(locals.locals)
    }

    /// Resolve a `TypeDefOrRef` coded index, `None` for a null reference
    fn resolve_type(&self, index: &CodedIndex) -> Result<Option<TypeReference>> {
        if index.is_null() {
            return Ok(None);
        }

        let resolved = match index.tag {
            TableId::TypeDef => TypeReference::Definition(index.token),
            TableId::TypeRef => self.resolve_type_ref(index.row)?,
            TableId::TypeSpec => self.resolve_type_spec(index)?,
            _ => TypeReference::Unresolved(index.token),
        };

        Ok(Some(resolved))
    }

    fn resolve_type_ref(&self, rid: u32) -> Result<TypeReference> {
        let (namespace, name) = self.type_ref_name(rid, 0)?;
        Ok(TypeReference::External { namespace, name })
    }

    /// Namespace and name of a `TypeRef`; nested references are named `Outer/Inner`
    fn type_ref_name(&self, rid: u32, depth: usize) -> Result<(String, String)> {
        if depth > MAX_TYPEREF_NESTING {
            return Err(RecursionLimit(MAX_TYPEREF_NESTING));
        }

        let Some(row) = self
            .streams
            .tables
            .table::<TypeRefRaw>()
            .and_then(|typerefs| typerefs.get(rid))
        else {
            return Err(TokenNotFound(Token::new(TableId::TypeRef.token_base() | rid)));
        };

        let name = self.streams.strings.get(row.type_name as usize)?;
        if row.resolution_scope.tag == TableId::TypeRef && !row.resolution_scope.is_null() {
            let (namespace, outer) = self.type_ref_name(row.resolution_scope.row, depth + 1)?;
            return Ok((namespace, format!("{outer}/{name}")));
        }

        let namespace = self.streams.strings.get(row.type_namespace as usize)?;
        Ok((namespace.to_string(), name.to_string()))
    }

    /// A `TypeSpec` resolves to its generic type definition; other constructed types stay
    /// unresolved
    fn resolve_type_spec(&self, index: &CodedIndex) -> Result<TypeReference> {
        let Some(row) = self
            .streams
            .tables
            .table::<TypeSpecRaw>()
            .and_then(|typespecs| typespecs.get(index.row))
        else {
            return Err(TokenNotFound(index.token));
        };

        let spec = parse_type_spec_signature(self.streams.blobs.get(row.signature as usize)?)?;
        let definition = match &spec.base {
            TypeSignature::GenericInst(base, _) => match base.as_ref() {
                TypeSignature::Class(token) | TypeSignature::ValueType(token) => Some(*token),
                _ => None,
            },
            TypeSignature::Class(token) | TypeSignature::ValueType(token) => Some(*token),
            _ => None,
        };

        match definition {
            Some(token) if token.table() == TableId::TypeDef as u8 => {
                Ok(TypeReference::Definition(token))
            }
            Some(token) if token.table() == TableId::TypeRef as u8 => {
                self.resolve_type_ref(token.row())
            }
            _ => Ok(TypeReference::Unresolved(index.token)),
        }
    }

    fn load_interfaces(&self, registry: &mut TypeRegistry, typedef_count: usize) -> Result<()> {
        let Some(interface_impls) = self.streams.tables.table::<InterfaceImplRaw>() else {
            return Ok(());
        };

        for row in interface_impls.rows()? {
            let class = Token::new(TableId::TypeDef.token_base() | row.class);
            if row.class == 0 || row.class as usize > typedef_count {
                return Err(TokenNotFound(class));
            }

            let Some(interface) = self.resolve_type(&row.interface)? else {
                continue;
            };

            if let Some(cil_type) = registry.get_mut(&class) {
                cil_type.interfaces.push(interface);
            }
        }

        Ok(())
    }

    fn load_nesting(&self, registry: &mut TypeRegistry) -> Result<()> {
        let Some(nested_classes) = self.streams.tables.table::<NestedClassRaw>() else {
            return Ok(());
        };

        for row in nested_classes.rows()? {
            let nested = row.nested_token();
            let enclosing = row.enclosing_token();

            match registry.get_mut(&nested) {
                Some(nested_type) => nested_type.enclosing_type = Some(enclosing),
                None => return Err(TokenNotFound(nested)),
            }

            match registry.get_mut(&enclosing) {
                Some(enclosing_type) => enclosing_type.nested_types.push(nested),
                None => return Err(TokenNotFound(enclosing)),
            }
        }

        Ok(())
    }
}
