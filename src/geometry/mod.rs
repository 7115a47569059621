mod shape;

pub use shape::{
    BoxShape, PointQuery, RayHit, Shape, ShapeKind, Sphere, COLLISION_SAMPLE_SPACING,
    MAX_EDGE_SUBDIVISIONS,
};
