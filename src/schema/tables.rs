//! Table schema definitions for the telecom infrastructure data model

use std::ops::RangeInclusive;

use super::types::*;

// =============================================================================
// Enumerated domains
// =============================================================================

pub const CONNECTIVITY_TYPES: &[&str] = &[
    "unknown",
    "mobile",
    "mobile_broadband",
    "metro",
    "fiber",
    "wireless",
    "satellite",
    "wired",
];

pub const RADIO_TYPES: &[&str] = &["2G", "3G", "4G", "5G"];

pub const BACKHAUL_TYPES: &[&str] = &["fiber", "microwave", "satellite"];

pub const POWER_SOURCES: &[&str] = &["grid", "generator", "solar"];

pub const TRANSMISSION_MEDIA: &[&str] = &["fiber", "microwave", "copper", "coaxial", "unknown"];

pub const BACKHAUL_TECHNOLOGIES: &[&str] = &["dwdm", "sdh", "tdm", "sonet"];

/// Node lifecycle, from proposal to decommissioning
pub const NODE_STATUSES: &[&str] = &[
    "proposed",
    "planned",
    "underconstruction",
    "operational",
    "decommissioned",
    "inactive",
];

/// Distance bands (km) of the per-POI cost results
pub const DISTANCE_BANDS_KM: RangeInclusive<u32> = 1..=25;

/// Expands to a column slice made of the given leading columns followed by the
/// fiber length / MST solution / technology triple of every listed band.
macro_rules! with_distance_bands {
    ([$($head:expr),* $(,)?], $($km:literal)*) => {
        &[
            $($head,)*
            $(
                Column::new(concat!("fiber_length_", $km, "km"), ColumnType::Float),
                Column::new(concat!("mst_solution_", $km, "km"), ColumnType::Integer),
                Column::new(concat!("technology_", $km, "km"), ColumnType::String(50)),
            )*
        ]
    };
}

const ID: ColumnType = ColumnType::String(50);
const CODE: ColumnType = ColumnType::String(3);
const ADMIN: ColumnType = ColumnType::String(100);

// =============================================================================
// Independent Tables (no FK dependencies)
// =============================================================================

pub static COST_PARAMETER: TableSchema = TableSchema {
    name: "cost_parameter",
    columns: &[
        Column::primary("cost_id", ID),
        // Fiber
        Column::required("hw_setup_cost_fiber", ColumnType::Float),
        Column::required("focl_constr_cost_fiber", ColumnType::Float),
        Column::required("reinv_period_fiber", ColumnType::Float),
        Column::required("an_hw_maint_and_repl_fiber", ColumnType::Float),
        Column::required("pp_fiber", ColumnType::Float),
        Column::required("an_traffic_fees_one_mbps_fiber", ColumnType::Float),
        Column::required("an_isp_fees_one_mbps_fiber", ColumnType::Float),
        Column::required("ch_throughput_fiber", ColumnType::Float),
        // Point-to-multipoint
        Column::required("hw_setup_cost_p2mp", ColumnType::Float),
        Column::required("reinv_period_p2mp", ColumnType::Float),
        Column::required("an_hw_maint_and_repl_p2mp", ColumnType::Float),
        Column::required("pp_p2mp", ColumnType::Float),
        Column::required("an_traffic_fees_one_mbps_p2mp", ColumnType::Float),
        Column::required("an_isp_fees_one_mbps_p2mp", ColumnType::Float),
        Column::required("ch_throughput_p2mp", ColumnType::Float),
        // Point-to-point
        Column::required("hw_setup_cost_p2p", ColumnType::Float),
        Column::required("access_link_setup_p2p", ColumnType::Float),
        Column::required("backhaul_link_num_p2p", ColumnType::Float),
        Column::required("backhaul_link_setup_p2p", ColumnType::Float),
        Column::required("retr_tower_num_p2p", ColumnType::Float),
        Column::required("retr_tower_inst_p2p", ColumnType::Float),
        Column::required("access_link_bandwidth_p2p", ColumnType::Float),
        Column::required("backhaul_link_bandwidth_p2p", ColumnType::Float),
        Column::required("one_time_license_fee_1mhz_p2p", ColumnType::Float),
        Column::required("an_license_fee_1mhz_p2p", ColumnType::Float),
        Column::required("an_traffic_fees_one_mbps_p2p", ColumnType::Float),
        Column::required("an_isp_fees_one_mbps_p2p", ColumnType::Float),
        Column::required("ch_throughput_p2p", ColumnType::Float),
        // Satellite
        Column::required("hw_setup_cost_sat", ColumnType::Float),
        Column::required("reinv_period_sat", ColumnType::Float),
        Column::required("an_hw_maint_and_repl_sat", ColumnType::Float),
        Column::required("pp_sat", ColumnType::Float),
        Column::required("an_traffic_fees_one_mbps_sat", ColumnType::Float),
        Column::required("an_isp_fees_one_mbps_sat", ColumnType::Float),
        Column::required("ch_throughput_sat", ColumnType::Float),
    ],
    foreign_keys: &[],
    indexes: &[],
};

pub static POINT_OF_INTEREST: TableSchema = TableSchema {
    name: "point_of_interest",
    columns: &[
        Column::primary("poi_id", ID),
        Column::new("source_poi_id", ID),
        Column::required("dataset_id", ID),
        Column::required("lat", ColumnType::Float),
        Column::required("lon", ColumnType::Float),
        Column::new("connectivity_type", ColumnType::Enum(CONNECTIVITY_TYPES)),
        Column::required("poi_type", ID),
        Column::new("is_public", ColumnType::Boolean),
        Column::new("poi_subtype", ID),
        Column::required("country_code", CODE),
        Column::new("admin1", ADMIN),
        Column::new("admin2", ADMIN),
        Column::new("admin3", ADMIN),
        Column::new("is_connected", ColumnType::Boolean),
        Column::new("has_electricity", ColumnType::Boolean),
        Column::new("electricity_type", ID),
        Column::new("label", ID),
    ],
    foreign_keys: &[],
    indexes: &[
        Index::on(&["dataset_id"]),
        Index::on(&["lat"]),
        Index::on(&["lon"]),
        Index::on(&["connectivity_type"]),
        Index::on(&["is_connected"]),
    ],
};

pub static CELL_SITE: TableSchema = TableSchema {
    name: "cell_site",
    columns: &[
        Column::primary("ict_id", ID),
        Column::new("source_ict_id", ID),
        Column::new("source_cell_id", ID),
        Column::required("dataset_id", ID),
        Column::required("country_code", CODE),
        Column::required("lat", ColumnType::Float),
        Column::required("lon", ColumnType::Float),
        Column::new("admin1", ADMIN),
        Column::new("admin2", ADMIN),
        Column::new("admin3", ADMIN),
        Column::new("operator_name", ADMIN),
        Column::new("radio_type", ColumnType::Enum(RADIO_TYPES)),
        Column::new("downlink_frequency_mhz", ColumnType::Float),
        Column::new("uplink_frequency_mhz", ColumnType::Float),
        Column::new("max_channel_bandwidth_mhz", ColumnType::Float),
        Column::new("eirp_dbm", ColumnType::Float),
        Column::new("tower_height", ColumnType::Float),
        Column::new("antenna_height", ColumnType::Float),
        Column::new("mechanical_tilt_degrees", ColumnType::Float),
        Column::new("electrical_tilt_degrees", ColumnType::Float),
        Column::new("azimuth_degrees", ColumnType::Float),
        Column::new("antenna_model", ADMIN),
        Column::new("antenna_gain", ColumnType::Float),
        Column::new("antenna_horizontal_beamwidth_degrees", ColumnType::Float),
        Column::new("antenna_vertical_beamwidth_degrees", ColumnType::Float),
        Column::new("backhaul_type", ColumnType::Enum(BACKHAUL_TYPES)),
        // Spelling matches the column name used by the processed extracts
        Column::new("backhaul_throuput_mbps", ColumnType::Float),
        Column::new("power_source", ColumnType::Enum(POWER_SOURCES)),
    ],
    foreign_keys: &[],
    indexes: &[
        Index::on(&["source_ict_id"]),
        Index::on(&["dataset_id"]),
        Index::on(&["lat"]),
        Index::on(&["lon"]),
        Index::on(&["radio_type"]),
        Index::on(&["backhaul_type"]),
        Index::on(&["power_source"]),
    ],
};

pub static TRANSMISSION_NODE: TableSchema = TableSchema {
    name: "transmission_node",
    columns: &[
        Column::primary("node_id", ID),
        Column::new("source_ict_id", ID),
        Column::required("dataset_id", ID),
        Column::required("country_code", CODE),
        Column::required("lat", ColumnType::Float),
        Column::required("lon", ColumnType::Float),
        Column::new("admin1", ADMIN),
        Column::new("admin2", ADMIN),
        Column::new("admin3", ADMIN),
        Column::new("physical_infrastructure_provider", ADMIN),
        Column::new("network_providers", ADMIN),
        Column::new("transmission_medium", ColumnType::Enum(TRANSMISSION_MEDIA)),
        Column::new("access_technologies", ADMIN),
        Column::new("backhaul_technologies", ColumnType::Enum(BACKHAUL_TECHNOLOGIES)),
        Column::required("is_actual", ColumnType::Boolean),
        Column::new("node_status", ColumnType::Enum(NODE_STATUSES)),
        Column::new("equipped_capacity_access_mbps", ColumnType::Integer),
        Column::new("potential_capacity_access_mbps", ColumnType::Integer),
        Column::new("equipped_capacity_backhaul_mbps", ColumnType::Integer),
        Column::new("potential_capacity_backhaul_mbps", ColumnType::Integer),
        Column::new("is_powered", ColumnType::Boolean),
        Column::new("power_source", ColumnType::Enum(POWER_SOURCES)),
    ],
    foreign_keys: &[],
    indexes: &[
        Index::on(&["dataset_id"]),
        Index::on(&["country_code"]),
        Index::on(&["lat"]),
        Index::on(&["lon"]),
        Index::on(&["transmission_medium"]),
        Index::on(&["backhaul_technologies"]),
        Index::on(&["node_status"]),
        Index::on(&["power_source"]),
    ],
};

pub static CELL_COVERAGE: TableSchema = TableSchema {
    name: "cell_coverage",
    columns: &[
        Column::primary("contour_id", ColumnType::Integer),
        Column::new("fid", ColumnType::Integer),
        Column::new("ID", ColumnType::Integer),
        Column::new("layer", ColumnType::Integer),
        Column::new("path", ID),
        Column::required("coverage", ColumnType::Integer),
    ],
    foreign_keys: &[],
    indexes: &[],
};

pub static FIBER_PATH_RESULT_EDGE: TableSchema = TableSchema {
    name: "fiber_path_result_edge",
    columns: &[
        Column::primary("edge_id", ColumnType::Integer),
        Column::new("u", ColumnType::Integer),
        Column::new("v", ColumnType::Integer),
        Column::new("key", ColumnType::Integer),
        Column::new("length", ColumnType::Integer),
        Column::new("geometry", ColumnType::Geometry(GeometryKind::LineString)),
        Column::new("name", ID),
        Column::new("osmid", ColumnType::Integer),
        Column::new("highway", ID),
        Column::new("oneway", ColumnType::Integer),
        Column::new("reversed", ColumnType::Integer),
        Column::new("lanes", ColumnType::Integer),
        Column::new("service", ID),
        Column::new("ref", ID),
        Column::new("maxspeed", ColumnType::Integer),
        Column::new("bridge", ID),
        Column::new("junction", ID),
        Column::new("access", ID),
    ],
    foreign_keys: &[],
    indexes: &[],
};

pub static FIBER_PATH_RESULT_NODE: TableSchema = TableSchema {
    name: "fiber_path_result_node",
    columns: &[
        Column::primary("node_id", ColumnType::Integer),
        Column::new("osmid", ID),
        Column::new("y", ColumnType::Float),
        Column::new("x", ColumnType::Float),
        Column::new("splitter", ID),
        Column::new("street_count", ColumnType::Integer),
        Column::new("lon", ColumnType::Float),
        Column::new("lat", ColumnType::Float),
        Column::new("geometry", ColumnType::Geometry(GeometryKind::Point)),
        Column::new("highway", ID),
    ],
    foreign_keys: &[],
    indexes: &[],
};

pub static COST_RESULT: TableSchema = TableSchema {
    name: "cost_result",
    columns: &[
        Column::primary("id", ID),
        Column::new("technology_selection_approach", ID),
        Column::new("basket_name", ID),
        Column::new("technology", ID),
        Column::new("number_poi", ColumnType::Integer),
        Column::new("fiber_length", ColumnType::Float),
        Column::new("pp_coo", ColumnType::Float),
        Column::new("pp_coo_per_poi", ColumnType::Float),
        Column::new("pp_capex", ColumnType::Float),
        Column::new("init_capex", ColumnType::Float),
        Column::new("an_opex", ColumnType::Float),
        Column::new("init_capex_per_poi", ColumnType::Float),
        Column::new("an_opex_per_poi", ColumnType::Float),
        Column::new("p2p", ID),
        Column::new("estimate", ColumnType::Float),
        Column::new("max_dist_km", ColumnType::Integer),
    ],
    foreign_keys: &[],
    indexes: &[],
};

// =============================================================================
// Level 1: depend on independent tables
// =============================================================================

pub static ANALYSIS: TableSchema = TableSchema {
    name: "analysis",
    columns: &[
        Column::primary("analysis_id", ID),
        Column::new("cost_parameter_id", ID),
    ],
    foreign_keys: &[ForeignKey::new("cost_parameter_id", "cost_parameter", "cost_id")],
    indexes: &[],
};

pub static MAPPING_RESULT: TableSchema = TableSchema {
    name: "mapping_result",
    columns: &[
        Column::primary("id", ID),
        Column::required("poi_id", ID),
        Column::required("lat", ColumnType::Float),
        Column::required("lon", ColumnType::Float),
        Column::new("cell_site_dist", ColumnType::Float),
        Column::new("_4G_cell_site_dist", ColumnType::Float),
        Column::new("_5G_cell_site_dist", ColumnType::Float),
        Column::new("transmission_node_dist", ColumnType::Float),
        Column::new("fiber_node_dist", ColumnType::Float),
        Column::new("population_1km", ColumnType::Integer),
        Column::new("poi_count_1km", ColumnType::Integer),
        Column::new("population_3km", ColumnType::Integer),
        Column::new("poi_count_3km", ColumnType::Integer),
        Column::new("population_5km", ColumnType::Integer),
        Column::new("poi_count_5km", ColumnType::Integer),
        Column::new("_4G_coverage", ColumnType::Boolean),
    ],
    foreign_keys: &[ForeignKey::new("poi_id", "point_of_interest", "poi_id")],
    indexes: &[],
};

pub static VISIBILITY_RESULT: TableSchema = TableSchema {
    name: "visibility_result",
    columns: &[
        Column::primary("id", ID),
        Column::required("poi_id", ID),
        Column::new("is_visible", ColumnType::Boolean),
        Column::new("num_visible", ColumnType::Integer),
        // First candidate cell site
        Column::new("cellsite_1", ID),
        Column::new("lat_1", ColumnType::Float),
        Column::new("lon_1", ColumnType::Float),
        Column::new("radio_type_1", ID),
        Column::new("ground_distance_1", ColumnType::Float),
        Column::new("antenna_los_distance_1", ColumnType::Float),
        Column::new("azimuth_angle_1", ColumnType::Float),
        Column::new("los_geometry_1", ID),
        // Second
        Column::new("cellsite_2", ID),
        Column::new("lat_2", ColumnType::Float),
        Column::new("lon_2", ColumnType::Float),
        Column::new("radio_type_2", ID),
        Column::new("ground_distance_2", ColumnType::Float),
        Column::new("antenna_los_distance_2", ColumnType::Float),
        Column::new("azimuth_angle_2", ColumnType::Float),
        Column::new("los_geometry_2", ID),
        // Third
        Column::new("cellsite_3", ID),
        Column::new("lat_3", ColumnType::Float),
        Column::new("lon_3", ColumnType::Float),
        Column::new("radio_type_3", ID),
        Column::new("ground_distance_3", ColumnType::Float),
        Column::new("antenna_los_distance_3", ColumnType::Float),
        Column::new("azimuth_angle_3", ColumnType::Float),
        Column::new("los_geometry_3", ID),
    ],
    foreign_keys: &[ForeignKey::new("poi_id", "point_of_interest", "poi_id")],
    indexes: &[],
};

pub static FIBER_PATH_RESULT_POI: TableSchema = TableSchema {
    name: "fiber_path_result_poi",
    columns: &[
        Column::primary("id", ID),
        Column::required("poi_id", ID),
        Column::new("closest_node_id", ID),
        Column::new("closest_node_distance", ColumnType::Float),
        Column::new("connected_node_id", ID),
        Column::new("connected_node_distance", ColumnType::Float),
        Column::new("fiber_path", ID),
        Column::new("upstream_node_id", ID),
        Column::new("upstream_node_distance", ColumnType::Float),
    ],
    foreign_keys: &[ForeignKey::new("poi_id", "point_of_interest", "poi_id")],
    indexes: &[],
};

pub static COST_RESULT_POI: TableSchema = TableSchema {
    name: "cost_result_poi",
    columns: with_distance_bands!(
        [
            Column::primary("id", ID),
            Column::required("poi_id", ID),
            Column::new("lat", ColumnType::Float),
            Column::new("lon", ColumnType::Float),
            Column::new("cell_site_dist", ColumnType::Float),
            Column::new("_4G_coverage", ColumnType::Integer),
            Column::new("is_connected", ColumnType::Integer),
            Column::new("is_visible", ColumnType::Boolean),
            Column::new("num_visible", ColumnType::Integer),
        ],
        1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21 22 23 24 25
    ),
    foreign_keys: &[ForeignKey::new("poi_id", "point_of_interest", "poi_id")],
    indexes: &[],
};

// =============================================================================
// Association tables (many-to-many fan-out from analysis)
// =============================================================================

pub static ANALYSIS_POI_ASSOCIATION: TableSchema = TableSchema {
    name: "analysis_poi_association",
    columns: &[Column::new("analysis_id", ID), Column::new("poi_id", ID)],
    foreign_keys: &[
        ForeignKey::new("analysis_id", "analysis", "analysis_id"),
        ForeignKey::new("poi_id", "point_of_interest", "poi_id"),
    ],
    indexes: &[],
};

pub static ANALYSIS_CELLSITE_ASSOCIATION: TableSchema = TableSchema {
    name: "analysis_cellsite_association",
    columns: &[Column::new("analysis_id", ID), Column::new("ict_id", ID)],
    foreign_keys: &[
        ForeignKey::new("analysis_id", "analysis", "analysis_id"),
        ForeignKey::new("ict_id", "cell_site", "ict_id"),
    ],
    indexes: &[],
};

pub static ANALYSIS_TRANSMISSIONNODE_ASSOCIATION: TableSchema = TableSchema {
    name: "analysis_transmissionnode_association",
    columns: &[Column::new("analysis_id", ID), Column::new("node_id", ID)],
    foreign_keys: &[
        ForeignKey::new("analysis_id", "analysis", "analysis_id"),
        ForeignKey::new("node_id", "transmission_node", "node_id"),
    ],
    indexes: &[],
};

pub static ANALYSIS_COVERAGE_ASSOCIATION: TableSchema = TableSchema {
    name: "analysis_coverage_association",
    columns: &[
        Column::new("analysis_id", ID),
        Column::new("contour_id", ColumnType::Integer),
    ],
    foreign_keys: &[
        ForeignKey::new("analysis_id", "analysis", "analysis_id"),
        ForeignKey::new("contour_id", "cell_coverage", "contour_id"),
    ],
    indexes: &[],
};

/// All tables, parents before children
pub static ALL_TABLES: &[&TableSchema] = &[
    // Independent tables
    &COST_PARAMETER,
    &POINT_OF_INTEREST,
    &CELL_SITE,
    &TRANSMISSION_NODE,
    &CELL_COVERAGE,
    &FIBER_PATH_RESULT_EDGE,
    &FIBER_PATH_RESULT_NODE,
    &COST_RESULT,
    // Level 1
    &ANALYSIS,
    &MAPPING_RESULT,
    &VISIBILITY_RESULT,
    &FIBER_PATH_RESULT_POI,
    &COST_RESULT_POI,
    // Association tables
    &ANALYSIS_POI_ASSOCIATION,
    &ANALYSIS_CELLSITE_ASSOCIATION,
    &ANALYSIS_TRANSMISSIONNODE_ASSOCIATION,
    &ANALYSIS_COVERAGE_ASSOCIATION,
];

/// Get table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}

/// Find the table whose data set directory is `dir_name` (e.g. `pointofinterest`)
pub fn table_for_dataset_dir(dir_name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES
        .iter()
        .find(|t| t.dataset_dir_name().eq_ignore_ascii_case(dir_name))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_seventeen_tables() {
        assert_eq!(ALL_TABLES.len(), 17);
        let associations = ALL_TABLES.iter().filter(|t| t.is_association()).count();
        assert_eq!(associations, 4);
    }

    #[test]
    fn test_foreign_keys_reference_existing_columns() {
        for table in ALL_TABLES {
            for fk in table.foreign_keys {
                assert!(table.has_column(fk.column), "{}.{}", table.name, fk.column);
                let parent = get_table(fk.references_table)
                    .unwrap_or_else(|| panic!("{} references {}", table.name, fk.references_table));
                let target = parent.column(fk.references_column).unwrap();
                assert!(target.primary_key, "{}.{} is not a key", parent.name, target.name);
                assert_eq!(
                    table.column(fk.column).unwrap().col_type,
                    target.col_type,
                    "type mismatch on {}.{}",
                    table.name,
                    fk.column
                );
            }
        }
    }

    #[test]
    fn test_cost_result_poi_has_every_distance_band() {
        for km in DISTANCE_BANDS_KM {
            for prefix in ["fiber_length", "mst_solution", "technology"] {
                let name = format!("{prefix}_{km}km");
                assert!(COST_RESULT_POI.has_column(&name), "missing {name}");
            }
        }
        assert_eq!(
            COST_RESULT_POI.columns.len(),
            9 + 3 * DISTANCE_BANDS_KM.count()
        );
        assert_eq!(
            COST_RESULT_POI.column("mst_solution_7km").unwrap().col_type,
            ColumnType::Integer
        );
    }

    #[test]
    fn test_enum_domains() {
        let radio = CELL_SITE.column("radio_type").unwrap();
        assert_eq!(radio.domain(), Some(RADIO_TYPES));
        let status = TRANSMISSION_NODE.column("node_status").unwrap();
        assert_eq!(status.domain().unwrap().first(), Some(&"proposed"));
        assert!(POINT_OF_INTEREST.column("country_code").unwrap().domain().is_none());
    }

    #[test]
    fn test_table_for_dataset_dir() {
        assert_eq!(table_for_dataset_dir("pointofinterest").unwrap().name, "point_of_interest");
        assert_eq!(table_for_dataset_dir("CellSite").unwrap().name, "cell_site");
        assert!(table_for_dataset_dir("roads").is_none());
    }
}
