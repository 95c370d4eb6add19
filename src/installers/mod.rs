// Installation strategies.
//
// mtest ships one kind of artifact: prebuilt executables attached to a release, with
// naming heuristics and custom download roots as fallbacks.

/// Resolves, downloads, unpacks and installs the prebuilt runtime binary.
pub(crate) mod prebuilt;
