//! Built-in vocabularies and their term lists.

/// A vocabulary known to the registry at compile time.
pub struct BuiltinVocab {
    /// Canonical namespace name used in configuration (`DCTERMS`).
    pub name: &'static str,
    /// Alternative names accepted for the namespace.
    pub aliases: &'static [&'static str],
    /// Serialization prefix.
    pub prefix: &'static str,
    /// Base IRI that local names are appended to.
    pub base: &'static str,
    /// Defined terms. `None` means any valid local name is accepted.
    pub terms: Option<&'static [&'static str]>,
}

pub const BUILTINS: &[BuiltinVocab] = &[
    BuiltinVocab {
        name: "RDF",
        aliases: &[],
        prefix: "rdf",
        base: "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
        terms: Some(RDF_TERMS),
    },
    BuiltinVocab {
        name: "RDFS",
        aliases: &[],
        prefix: "rdfs",
        base: "http://www.w3.org/2000/01/rdf-schema#",
        terms: Some(RDFS_TERMS),
    },
    BuiltinVocab {
        name: "OWL",
        aliases: &[],
        prefix: "owl",
        base: "http://www.w3.org/2002/07/owl#",
        terms: Some(OWL_TERMS),
    },
    BuiltinVocab {
        name: "XSD",
        aliases: &[],
        prefix: "xsd",
        base: "http://www.w3.org/2001/XMLSchema#",
        terms: Some(XSD_TERMS),
    },
    BuiltinVocab {
        name: "DCTERMS",
        aliases: &[],
        prefix: "dcterms",
        base: "http://purl.org/dc/terms/",
        terms: Some(DCTERMS_TERMS),
    },
    BuiltinVocab {
        name: "DC",
        aliases: &["DC11"],
        prefix: "dc",
        base: "http://purl.org/dc/elements/1.1/",
        terms: Some(DC_TERMS),
    },
    BuiltinVocab {
        name: "SKOS",
        aliases: &[],
        prefix: "skos",
        base: "http://www.w3.org/2004/02/skos/core#",
        terms: Some(SKOS_TERMS),
    },
    BuiltinVocab {
        name: "FOAF",
        aliases: &[],
        prefix: "foaf",
        base: "http://xmlns.com/foaf/0.1/",
        terms: Some(FOAF_TERMS),
    },
    // schema.org defines thousands of terms and grows every release.
    BuiltinVocab {
        name: "SDO",
        aliases: &["SCHEMA"],
        prefix: "schema",
        base: "https://schema.org/",
        terms: None,
    },
];

const RDF_TERMS: &[&str] = &[
    "type",
    "Property",
    "Statement",
    "subject",
    "predicate",
    "object",
    "first",
    "rest",
    "nil",
    "List",
    "value",
    "Alt",
    "Bag",
    "Seq",
    "XMLLiteral",
    "HTML",
    "JSON",
    "langString",
    "PlainLiteral",
    "CompoundLiteral",
    "language",
    "direction",
];

const RDFS_TERMS: &[&str] = &[
    "Resource",
    "Class",
    "Literal",
    "Container",
    "ContainerMembershipProperty",
    "Datatype",
    "subClassOf",
    "subPropertyOf",
    "comment",
    "label",
    "domain",
    "range",
    "seeAlso",
    "isDefinedBy",
    "member",
];

const OWL_TERMS: &[&str] = &[
    "AllDifferent",
    "AnnotationProperty",
    "Class",
    "DatatypeProperty",
    "FunctionalProperty",
    "InverseFunctionalProperty",
    "NamedIndividual",
    "Nothing",
    "ObjectProperty",
    "Ontology",
    "Restriction",
    "SymmetricProperty",
    "Thing",
    "TransitiveProperty",
    "allValuesFrom",
    "bottomObjectProperty",
    "cardinality",
    "complementOf",
    "deprecated",
    "differentFrom",
    "disjointWith",
    "distinctMembers",
    "equivalentClass",
    "equivalentProperty",
    "hasValue",
    "imports",
    "intersectionOf",
    "inverseOf",
    "maxCardinality",
    "minCardinality",
    "onProperty",
    "oneOf",
    "priorVersion",
    "sameAs",
    "someValuesFrom",
    "topObjectProperty",
    "unionOf",
    "versionIRI",
    "versionInfo",
];

const XSD_TERMS: &[&str] = &[
    "string",
    "boolean",
    "decimal",
    "integer",
    "double",
    "float",
    "date",
    "time",
    "dateTime",
    "dateTimeStamp",
    "duration",
    "gYear",
    "gYearMonth",
    "gMonth",
    "gMonthDay",
    "gDay",
    "hexBinary",
    "base64Binary",
    "anyURI",
    "language",
    "normalizedString",
    "token",
    "NMTOKEN",
    "Name",
    "NCName",
    "long",
    "int",
    "short",
    "byte",
    "nonNegativeInteger",
    "positiveInteger",
    "nonPositiveInteger",
    "negativeInteger",
    "unsignedLong",
    "unsignedInt",
    "unsignedShort",
    "unsignedByte",
];

const DCTERMS_TERMS: &[&str] = &[
    // properties
    "abstract",
    "accessRights",
    "accrualMethod",
    "accrualPeriodicity",
    "accrualPolicy",
    "alternative",
    "audience",
    "available",
    "bibliographicCitation",
    "conformsTo",
    "contributor",
    "coverage",
    "created",
    "creator",
    "date",
    "dateAccepted",
    "dateCopyrighted",
    "dateSubmitted",
    "description",
    "educationLevel",
    "extent",
    "format",
    "hasFormat",
    "hasPart",
    "hasVersion",
    "identifier",
    "instructionalMethod",
    "isFormatOf",
    "isPartOf",
    "isReferencedBy",
    "isReplacedBy",
    "isRequiredBy",
    "isVersionOf",
    "issued",
    "language",
    "license",
    "mediator",
    "medium",
    "modified",
    "provenance",
    "publisher",
    "references",
    "relation",
    "replaces",
    "requires",
    "rights",
    "rightsHolder",
    "source",
    "spatial",
    "subject",
    "tableOfContents",
    "temporal",
    "title",
    "type",
    "valid",
    // classes
    "Agent",
    "AgentClass",
    "BibliographicResource",
    "FileFormat",
    "Frequency",
    "Jurisdiction",
    "LicenseDocument",
    "LinguisticSystem",
    "Location",
    "LocationPeriodOrJurisdiction",
    "MediaType",
    "MediaTypeOrExtent",
    "MethodOfAccrual",
    "MethodOfInstruction",
    "PeriodOfTime",
    "PhysicalMedium",
    "PhysicalResource",
    "Policy",
    "ProvenanceStatement",
    "RightsStatement",
    "SizeOrDuration",
    "Standard",
    // datatypes and encoding schemes
    "Box",
    "ISO3166",
    "ISO639-2",
    "ISO639-3",
    "Period",
    "Point",
    "RFC1766",
    "RFC3066",
    "RFC4646",
    "RFC5646",
    "URI",
    "W3CDTF",
    "DCMIType",
    "DDC",
    "IMT",
    "LCC",
    "LCSH",
    "MESH",
    "NLM",
    "TGN",
    "UDC",
];

const DC_TERMS: &[&str] = &[
    "contributor",
    "coverage",
    "creator",
    "date",
    "description",
    "format",
    "identifier",
    "language",
    "publisher",
    "relation",
    "rights",
    "source",
    "subject",
    "title",
    "type",
];

const SKOS_TERMS: &[&str] = &[
    "Concept",
    "ConceptScheme",
    "Collection",
    "OrderedCollection",
    "prefLabel",
    "altLabel",
    "hiddenLabel",
    "notation",
    "note",
    "changeNote",
    "definition",
    "editorialNote",
    "example",
    "historyNote",
    "scopeNote",
    "broader",
    "narrower",
    "related",
    "broaderTransitive",
    "narrowerTransitive",
    "semanticRelation",
    "inScheme",
    "hasTopConcept",
    "topConceptOf",
    "member",
    "memberList",
    "mappingRelation",
    "exactMatch",
    "closeMatch",
    "broadMatch",
    "narrowMatch",
    "relatedMatch",
];

const FOAF_TERMS: &[&str] = &[
    "Agent",
    "Person",
    "Organization",
    "Group",
    "Document",
    "Image",
    "OnlineAccount",
    "Project",
    "name",
    "givenName",
    "familyName",
    "nick",
    "mbox",
    "homepage",
    "depiction",
    "depicts",
    "img",
    "knows",
    "member",
    "page",
    "primaryTopic",
    "isPrimaryTopicOf",
    "topic",
    "made",
    "maker",
    "based_near",
    "title",
    "logo",
    "account",
    "accountName",
    "weblog",
    "thumbnail",
    "interest",
    "age",
    "birthday",
    "gender",
];
