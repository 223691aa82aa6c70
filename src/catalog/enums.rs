//! Target SDK enumerations accepted as string literals.

/// A target enumeration: values are passed as member names and emitted as
/// `Name.Member`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enumeration {
    pub name: &'static str,
    pub members: &'static [&'static str],
}

pub const WAIT_BEHAVIOR: Enumeration = Enumeration {
    name: "WaitBehavior",
    members: &["WaitOnResourceUnavailable", "StopOnResourceUnavailable"],
};

pub const ICON_VARIANT: Enumeration = Enumeration {
    name: "IconVariant",
    members: &["Regular", "Filled"],
};

pub const PROBE_TYPE: Enumeration = Enumeration {
    name: "ProbeType",
    members: &["Startup", "Readiness", "Liveness"],
};

pub const CONTAINER_LIFETIME: Enumeration = Enumeration {
    name: "ContainerLifetime",
    members: &["Session", "Persistent"],
};

pub const IMAGE_PULL_POLICY: Enumeration = Enumeration {
    name: "ImagePullPolicy",
    members: &["Default", "Always", "Missing"],
};

pub const OTLP_PROTOCOL: Enumeration = Enumeration {
    name: "OtlpProtocol",
    members: &["Grpc", "HttpProtobuf"],
};

pub const REFERENCE_ENVIRONMENT_INJECTION_FLAGS: Enumeration = Enumeration {
    name: "ReferenceEnvironmentInjectionFlags",
    members: &[
        "None",
        "ConnectionString",
        "ConnectionProperties",
        "ServiceDiscovery",
        "Endpoints",
        "All",
    ],
};

pub const PROTOCOL_TYPE: Enumeration = Enumeration {
    name: "ProtocolType",
    members: &[
        "Unknown",
        "IP",
        "IPv6HopByHopOptions",
        "Unspecified",
        "Icmp",
        "Igmp",
        "Ggp",
        "IPv4",
        "Tcp",
        "Pup",
        "Udp",
        "Idp",
        "IPv6",
        "IPv6RoutingHeader",
        "IPv6FragmentHeader",
        "IPSecEncapsulatingSecurityPayload",
        "IPSecAuthenticationHeader",
        "IcmpV6",
        "IPv6NoNextHeader",
        "IPv6DestinationOptions",
        "ND",
        "Raw",
        "Ipx",
        "Spx",
        "SpxII",
    ],
};

pub const CERTIFICATE_TRUST_SCOPE: Enumeration = Enumeration {
    name: "CertificateTrustScope",
    members: &["None", "Append", "Override", "System"],
};

pub const UNIX_FILE_MODE: Enumeration = Enumeration {
    name: "UnixFileMode",
    members: &[
        "None",
        "OtherExecute",
        "OtherWrite",
        "OtherRead",
        "GroupExecute",
        "GroupWrite",
        "GroupRead",
        "UserExecute",
        "UserWrite",
        "UserRead",
        "StickyBit",
        "SetGroup",
        "SetUser",
    ],
};

pub const STORE_NAME: Enumeration = Enumeration {
    name: "StoreName",
    members: &[
        "AddressBook",
        "AuthRoot",
        "CertificateAuthority",
        "Disallowed",
        "My",
        "Root",
        "TrustedPeople",
        "TrustedPublisher",
    ],
};

pub const STORE_LOCATION: Enumeration = Enumeration {
    name: "StoreLocation",
    members: &["CurrentUser", "LocalMachine"],
};

pub const ALL: [Enumeration; 12] = [
    WAIT_BEHAVIOR,
    ICON_VARIANT,
    PROBE_TYPE,
    CONTAINER_LIFETIME,
    IMAGE_PULL_POLICY,
    OTLP_PROTOCOL,
    REFERENCE_ENVIRONMENT_INJECTION_FLAGS,
    PROTOCOL_TYPE,
    CERTIFICATE_TRUST_SCOPE,
    UNIX_FILE_MODE,
    STORE_NAME,
    STORE_LOCATION,
];
