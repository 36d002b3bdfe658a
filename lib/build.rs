fn main() {
    // The generated records are checked in; regenerating them needs `protoc`.
    #[cfg(feature = "regenerate-protos")]
    regenerate_records();
}

#[cfg(feature = "regenerate-protos")]
fn regenerate_records() {
    use std::path::Path;

    let proto_path = Path::new("protos");
    let output_dir = Path::new("./src/generated/");

    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir).expect("can create directory at given path");
    }

    if let Some(proto_path) = proto_path.to_str() {
        println!("cargo:rerun-if-changed={proto_path}");
    }

    prost_build::Config::new()
        .default_package_filename("records")
        .out_dir(output_dir)
        .compile_protos(&[proto_path.join("records.proto")], &[proto_path])
        .expect("protos are valid and should compile");
}
