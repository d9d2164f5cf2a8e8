//! Well-known property names and file names.

/// Environment key enabling enforcement. Its value is not interpreted.
pub const REGIONS_PROPERTY_NAME: &str = "apiregions.regions";

/// Environment key naming the directory or URL holding all four files.
pub const PROPERTIES_FILE_LOCATION: &str = "apiregions.location";

/// Environment key prefix naming the location of a single file.
pub const PROPERTIES_RESOURCE_PREFIX: &str = "apiregions.resource.";

/// Environment key with the comma-separated default regions.
pub const DEFAULT_REGIONS: &str = "apiregions.default";

/// Environment key with the comma-separated regions joined into `global`.
pub const APIREGIONS_JOINGLOBAL: &str = "apiregions.joinglobal";

/// Base file for the bundle identity table (`bsn~version=id,...`).
pub const IDBSNVER_FILENAME: &str = "idbsnver.properties";

/// Base file for the bundle to feature table.
pub const BUNDLE_FEATURE_FILENAME: &str = "bundles.properties";

/// Base file for the feature to region table.
pub const FEATURE_REGION_FILENAME: &str = "features.properties";

/// Base file for the region to package table.
pub const REGION_PACKAGE_FILENAME: &str = "regions.properties";

/// All base files, in load order.
pub const BASE_FILENAMES: [&str; 4] = [
    IDBSNVER_FILENAME,
    BUNDLE_FEATURE_FILENAME,
    FEATURE_REGION_FILENAME,
    REGION_PACKAGE_FILENAME,
];

/// Overlay property feeding the bundle identity table (`id=bsn~version`).
pub const PROP_IDBSNVER: &str = "mapping.bundleid.bsnver";

/// Overlay property feeding the bundle to feature table.
pub const PROP_BUNDLE_FEATURES: &str = "mapping.bundleid.features";

/// Overlay property feeding the feature to region table.
pub const PROP_FEATURE_REGIONS: &str = "mapping.featureid.regions";

/// Overlay property feeding the region to package table.
pub const PROP_REGION_PACKAGE: &str = "mapping.region.packages";

/// Name of the persisted bundle-location table inside the private data area.
pub const BUNDLE_LOCATION_FEATURE_FILENAME: &str = "bundleLocationToFeature.json";

/// Location scheme reading from [`crate::source::EmbeddedResources`].
pub const CLASSLOADER_SCHEME: &str = "classloader://";

/// Management property that switches enforcement off when set to `true`.
pub const DISABLE_PROPERTY: &str = "disable";
